use amt_cli::cli::Cli;
use amt_cli::commands;
use amt_cli::error::CliError;
use amt_cli::logging;
use amt_cli::output::{self, CommandResult, OutputFormat, ResultBuilder};
use clap::Parser;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;

	if let Err(err) = commands::dispatch(cli, format).await {
		handle_error(err, format);
		std::process::exit(1);
	}
}

fn handle_error(err: CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	// Always print to stderr for humans
	output::print_error_stderr(&cmd_error);

	// Also emit the envelope to stdout with ok=false for scripts
	if format != OutputFormat::Text {
		let result: CommandResult<()> = ResultBuilder::new("error").error(cmd_error).build();
		output::print_result(&result, format);
	}
}
