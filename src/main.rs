pub mod cli;
pub mod doc;
pub mod export;
pub mod flatten;
pub mod mock;
pub mod probe;

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}
