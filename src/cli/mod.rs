use clap::Parser;

#[derive(Parser)]
#[command(name = "tidings")]
#[command(
    version,
    about = "Collect company news and quote data into JSON files"
)]
#[command(
    long_about = "Prompts for a company name, crawls six news sites for matching articles and scrapes Yahoo Finance and Google Finance quote pages. News is written to data/<company>.json and quotes to financial-data/<company>_data.json."
)]
pub struct Cli {}
