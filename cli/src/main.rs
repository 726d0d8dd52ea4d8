mod commands;
mod terminal;

use commands::{CommandLine, Commands, check, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    match commands.command {
        Commands::Scan(args) => {
            print::header("starting scan run");
            scan::scan(args).await
        }
        Commands::Check { engine_bin } => {
            print::header("engine check");
            check::check(&engine_bin).await
        }
    }
}
