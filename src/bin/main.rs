use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::io::{self, Write};
use clap::Parser as ClapParser;
use lox_expr::Lox;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Script to run; starts a prompt when omitted")]
    pub script: Option<PathBuf>,

    #[clap(short, long, help = "Print scanned tokens and parsed statements to stderr")]
    pub verbose: bool,
}

fn main() -> ExitCode {
    let config: Config = Config::parse();

    let result = match &config.script {
        Some(path) => run_file(path, config.verbose),
        None => run_prompt(config.verbose).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        },
    }
}

fn run_file(path: &Path, verbose: bool) -> io::Result<ExitCode> {
    let contents = std::fs::read_to_string(path)?;
    let mut lox = Lox::new(io::stdout(), io::stderr()).verbose(verbose);
    lox.run(&contents)?;

    Ok(if lox.had_error() {
        ExitCode::from(65)
    } else if lox.had_runtime_error() {
        ExitCode::from(70)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_prompt(verbose: bool) -> io::Result<()> {
    let mut buffer = String::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut lox = Lox::new(io::stdout(), io::stderr()).verbose(verbose);

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        buffer.clear();

        let num_bytes = stdin.read_line(&mut buffer)?;
        if num_bytes == 0 || buffer.trim_end() == ".exit" { break };

        lox.run(&buffer)?;
        lox.reset_error();
    }

    Ok(())
}
