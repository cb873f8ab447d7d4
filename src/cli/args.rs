use clap::{Args, Parser, Subcommand, ValueEnum};

/// A command line tool to use POSIX message queues from the shell.
#[derive(Parser, Debug)]
#[command(name = "mq", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Produce verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Prefix each diagnostic line with a timestamp
    #[arg(short, long, global = true)]
    pub timestamp: bool,

    /// Delimiter appended after each received message
    #[arg(short, long, global = true, value_enum, default_value = "n")]
    pub delimiter: Delimiter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a POSIX message queue
    Create(CreateArgs),
    /// Print information about an existing message queue
    Info(InfoArgs),
    /// Delete a message queue
    Unlink(UnlinkArgs),
    /// Send a message to a message queue
    Send(SendArgs),
    /// Receive and print a message from a message queue
    Recv(RecvArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Queue name (e.g. /myqueue)
    pub qname: String,

    /// Maximum number of messages in the queue
    #[arg(short, long, default_value_t = 10)]
    pub maxmsg: i64,

    /// Message size in bytes
    #[arg(short = 's', long, default_value_t = 1024)]
    pub msgsize: i64,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Queue name
    pub qname: String,
}

#[derive(Args, Debug)]
pub struct UnlinkArgs {
    /// Queue name
    pub qname: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Queue name
    pub qname: String,

    /// Message payload; read from stdin until EOF when omitted
    pub message: Option<String>,

    /// Message priority
    #[arg(short, long, default_value_t = 0)]
    pub priority: u32,

    /// Fail instead of blocking when the queue is full
    #[arg(short = 'n', long)]
    pub non_blocking: bool,
}

#[derive(Args, Debug)]
pub struct RecvArgs {
    /// Queue name
    pub qname: String,

    /// Fail instead of blocking when the queue is empty
    #[arg(short = 'n', long)]
    pub non_blocking: bool,

    /// Keep receiving and printing messages as they arrive
    #[arg(short, long)]
    pub follow: bool,
}

/// Output delimiter appended after each received message.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Newline (0x0a)
    #[value(name = "n")]
    Newline,
    /// NUL byte (0x00)
    #[value(name = "z")]
    Nul,
    /// No delimiter
    #[value(name = "x")]
    None,
}

impl Delimiter {
    /// The byte appended after each message, if any.
    pub fn byte(self) -> Option<u8> {
        match self {
            Delimiter::Newline => Some(b'\n'),
            Delimiter::Nul => Some(0),
            Delimiter::None => Option::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let cli = Cli::try_parse_from(["mq", "create", "/myqueue"]).unwrap();
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.qname, "/myqueue");
                assert_eq!(args.maxmsg, 10);
                assert_eq!(args.msgsize, 1024);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(!cli.verbose);
        assert_eq!(cli.delimiter, Delimiter::Newline);
    }

    #[test]
    fn test_create_with_capacity() {
        let cli = Cli::try_parse_from([
            "mq", "create", "/q", "--maxmsg", "5", "--msgsize", "64",
        ])
        .unwrap();
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.maxmsg, 5);
                assert_eq!(args.msgsize, 64);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_send_with_message_and_priority() {
        let cli = Cli::try_parse_from(["mq", "send", "/q", "hello", "-p", "3", "-n"]).unwrap();
        match cli.command {
            Commands::Send(args) => {
                assert_eq!(args.message.as_deref(), Some("hello"));
                assert_eq!(args.priority, 3);
                assert!(args.non_blocking);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_send_without_message_reads_stdin() {
        let cli = Cli::try_parse_from(["mq", "send", "/q"]).unwrap();
        match cli.command {
            Commands::Send(args) => {
                assert!(args.message.is_none());
                assert_eq!(args.priority, 0);
                assert!(!args.non_blocking);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_recv_follow() {
        let cli = Cli::try_parse_from(["mq", "recv", "/q", "--follow", "--verbose"]).unwrap();
        match cli.command {
            Commands::Recv(args) => {
                assert!(args.follow);
                assert!(!args.non_blocking);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn test_delimiter_values() {
        let cli = Cli::try_parse_from(["mq", "recv", "/q", "-d", "z"]).unwrap();
        assert_eq!(cli.delimiter.byte(), Some(0));

        let cli = Cli::try_parse_from(["mq", "recv", "/q", "-d", "x"]).unwrap();
        assert_eq!(cli.delimiter.byte(), None);

        let cli = Cli::try_parse_from(["mq", "recv", "/q"]).unwrap();
        assert_eq!(cli.delimiter.byte(), Some(b'\n'));

        assert!(Cli::try_parse_from(["mq", "recv", "/q", "-d", "q"]).is_err());
    }

    #[test]
    fn test_missing_queue_name_rejected() {
        assert!(Cli::try_parse_from(["mq", "info"]).is_err());
        assert!(Cli::try_parse_from(["mq"]).is_err());
    }
}
