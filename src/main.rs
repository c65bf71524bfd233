use clap::{Parser, Subcommand};

use pstats_browser::Result;
use pstats_browser::render::render_text_table;
use pstats_browser::stats::load_stats_file;
use pstats_browser::table::{Column, StatsTableModel};
use pstats_browser::tui;

#[derive(Parser)]
#[command(name = "pstats-browser")]
#[command(about = "Call-profile statistics browser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a statistics file in an interactive table.
    View {
        /// Path to a statistics file (JSON dump or text listing).
        stats: String,
    },

    /// Print the statistics table to stdout.
    Dump {
        /// Path to a statistics file (JSON dump or text listing).
        stats: String,

        /// Column to sort by (e.g. cumtime, time, calls, function).
        #[arg(long, default_value = "cumtime")]
        sort: Column,

        /// Sort ascending instead of descending.
        #[arg(long)]
        asc: bool,

        /// Keep only rows whose path or function contains this text.
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of rows to print.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::View { stats } => {
            let index = load_stats_file(&stats)?;
            let mut model = StatsTableModel::new();
            model.set_stats(Some(&index));
            // Start the way profile listings are usually read: biggest
            // cumulative cost first.
            model.set_sort_column(Column::CumTime, false);
            tui::run(model, &stats)
        }
        Commands::Dump {
            stats,
            sort,
            asc,
            filter,
            limit,
        } => {
            let index = load_stats_file(&stats)?;
            let mut model = StatsTableModel::new();
            model.set_stats(Some(&index));
            model.set_sort_column(sort, asc);
            if let Some(text) = filter {
                model.set_filter(&text);
            }
            print!("{}", render_text_table(&model, limit));
            Ok(())
        }
    }
}
