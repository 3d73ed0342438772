use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tamarin::{new_interpreter, Engine};

#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Run {
        #[arg(name = "FILE")]
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { path }) => {
            execute_file(path, new_interpreter()).unwrap_or_else(|err| {
                println!("{}", err);
                std::process::exit(1);
            });
        }
        None => {
            start_repl(new_interpreter());
        }
    }
}

fn execute_file(path: PathBuf, mut engine: Box<dyn Engine>) -> Result<()> {
    let input = fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?;

    let output = engine.run(&input)?;
    println!("{}", output);

    Ok(())
}

fn start_repl(mut engine: Box<dyn Engine>) {
    loop {
        print!(">>");
        io::stdout().flush().unwrap();

        let mut input = String::new();

        io::stdin()
            .read_line(&mut input)
            .expect("Failed to read line");

        match engine.run(&input) {
            Ok(output) => println!("{}", output),
            Err(err) => {
                println!("{}", TAMARIN_FACE);
                println!("Woops! We ran into some monkey business here!");
                println!("ERROR: {}", err);
                continue;
            }
        }
    }
}

const TAMARIN_FACE: &str = r#"
            __,__
   .--.  .-"     "-.  .--.
  / .. \/  .-. .-.  \/ .. \
 | |  '|  /   Y   \  |'  | |
 | \   \  \ 0 | 0 /  /   / |
  \ '- ,\.-"""""""-./, -' /
   ''-' /_   ^ ^   _\ '-''
       |  \._   _./  |
       \   \ '~' /   /
        '._ '-=-' _.'
           '-----'
"#;
