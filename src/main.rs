use anyhow::Context;

fn main() -> anyhow::Result<()> {
    pixmark::run().context("pixmark session failed")
}
