use qsh::{Client, Config, Error, Result};
use std::io::{BufRead as _, IsTerminal as _, Write as _};

fn main() -> Result {
    let config = Config::load()?;
    init_tracing(&config);

    let prompt = config.prompt.clone();
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let source = move || {
        if interactive {
            print!("{prompt}=> ");
            std::io::stdout().flush()?;
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(Error::Eof);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line.chars().collect())
    };

    // No database driver is wired in yet; assembled statements are echoed to
    // stdout so the binary can be driven end to end from a pipe.
    let executor = |sql: &str| -> Result {
        println!("{sql}");
        Ok(())
    };
    Client::new(config, source, executor, std::io::stdout()).run()
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
