use hostio::adapt::WriteStream;
use hostio::fs::FileInput;
use hostio::{InputStream, OutputStreamExt};

use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::{Format, Severity};
use sloggers::Build;

fn main() {
    std::process::exit(real_main());
}

fn real_main() -> i32 {
    let mut builder = TerminalLoggerBuilder::new();
    builder.level(Severity::Debug);
    builder.destination(Destination::Stderr);
    builder.format(Format::Full);
    let logger = builder.build().unwrap();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            slog::crit!(logger, "usage: cat <file>");
            return 2;
        }
    };

    let mut input = match FileInput::open_with_logger(&path, logger.clone()) {
        Ok(input) => input,
        Err(e) => {
            slog::crit!(logger, "{}", e);
            return 1;
        }
    };

    let mut stdout = WriteStream::new(std::io::stdout());
    let mut buf = [0; 8192];
    loop {
        let n = input.read(&mut buf);
        if n == 0 {
            break;
        }
        if stdout.write_full(&buf[..n]) < n {
            slog::crit!(logger, "short write to stdout");
            return 1;
        }
    }

    0
}
