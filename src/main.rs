use anyhow::Result;
use clap::Parser;
use mq::cli::{Cli, Commands};
use mq::logging;
use mq::queue::executor;
use std::io;
use std::process;

fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.timestamp);

    if let Err(err) = run(cli) {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let delimiter = cli.delimiter.byte();
    let mut stdout = io::stdout();
    match cli.command {
        Commands::Create(args) => executor::create(&args.qname, args.maxmsg, args.msgsize)?,
        Commands::Info(args) => executor::info(&args.qname, &mut stdout)?,
        Commands::Unlink(args) => executor::unlink(&args.qname)?,
        Commands::Send(args) => {
            executor::send(&args.qname, args.message, args.priority, args.non_blocking)?
        }
        Commands::Recv(args) => executor::recv(
            &args.qname,
            args.non_blocking,
            args.follow,
            delimiter,
            &mut stdout,
        )?,
    }
    Ok(())
}
