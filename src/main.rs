use clap::{Parser as ClapParser, Subcommand};
use squeak::Mode;
use squeak::cli::{self, CliError, CteCommand, TreeCommand, WhereCommand};
use std::io::{self, Read};
use tracing::Level;

#[derive(ClapParser)]
#[command(name = "squeak")]
#[command(about = "Squeak - surgical WHERE and CTE rewriting for SQL queries")]
#[command(version)]
struct Cli {
    /// Log rewrite decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append to or replace the WHERE clause of a query
    Where {
        /// Predicate to add, e.g. "col_1 = 3 OR col_2 = 4"
        clause: String,

        /// SQL query (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Filter the named CTE instead of the main statement
        #[arg(long)]
        cte: Option<String>,

        /// `append` joins with AND, `replace` discards the existing clause
        #[arg(short, long, default_value = "append")]
        mode: Mode,

        /// Clause keyword that must follow WHERE; repeat to replace the default list
        #[arg(long = "follow-keyword", value_name = "KEYWORD")]
        follow_keywords: Vec<String>,
    },

    /// Print the body of a named CTE
    Cte {
        /// CTE name (case-sensitive)
        name: String,

        /// SQL query (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Print the grouped token tree as JSON
    Tree {
        /// SQL query (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    let output = match command {
        Commands::Where {
            clause,
            input,
            cte,
            mode,
            follow_keywords,
        } => cli::execute_where(&WhereCommand {
            query: read_input(input)?,
            clause,
            cte,
            mode,
            follow_keywords,
        })?,
        Commands::Cte { name, input } => cli::execute_cte(&CteCommand {
            query: read_input(input)?,
            name,
        })?,
        Commands::Tree { input, pretty } => cli::execute_tree(&TreeCommand {
            query: read_input(input)?,
            pretty,
        })?,
    };
    println!("{}", output);
    Ok(())
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}
