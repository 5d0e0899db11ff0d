mod command;
mod logger;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
