use clap::Parser;
use codedump::{
    Cli, CodeDump, CodeDumpError, OutputFormatter, OutputMode, UserFriendlyError,
};
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli);

    let exit_code = run(&cli);
    process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    if cli.generate_config {
        return handle_generate_config(cli);
    }

    let codedump = match CodeDump::from_cli(cli) {
        Ok(codedump) => codedump,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&codedump);
    }

    match codedump.run() {
        // Unreadable files are recorded in the dump and do not fail the run.
        Ok(report) => {
            codedump.output_formatter().print_collection_report(&report);
            0
        }
        Err(e) => {
            codedump.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &CodeDumpError) -> i32 {
    match error {
        CodeDumpError::InvalidRoot { .. } => 2,
        CodeDumpError::OutputNotWritable { .. } => 3,
        CodeDumpError::Io(_) => 4,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "codedump.toml".to_string());

    match CodeDump::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  codedump --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(codedump: &CodeDump) -> i32 {
    let formatter = codedump.output_formatter();
    let scan = codedump.scan_configuration();

    formatter.info("DRY RUN MODE - nothing will be written");
    formatter.info(&format!("Root: {}", scan.root().display()));
    formatter.info(&format!("Output: {}", scan.output().display()));
    formatter.debug(&format!("Extensions: {}", scan.extensions().join(" ")));
    formatter.debug(&format!("Excluded directories: {}", scan.exclude_dirs().join(" ")));
    formatter.debug(&format!("Excluded files: {}", scan.exclude_files().join(" ")));

    match codedump.dry_run() {
        Ok(files) => {
            formatter.print_plan(&files);
            0
        }
        Err(e) => {
            codedump.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn print_startup_error(error: &CodeDumpError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
