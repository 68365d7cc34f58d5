use anyhow::Result;
use clap::Parser;
use engine::{Document, DocumentStatus, SearchServer};
use toolkit::process_queries_joined;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "demo")]
#[command(about = "Seed a sample corpus and run queries through the search engine", long_about = None)]
struct Cli {
    /// Queries to run; defaults to the built-in sample queries
    #[arg(long)]
    query: Vec<String>,
    /// Use the parallel search path
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Print results as JSON instead of plain text
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn sample_server() -> Result<SearchServer> {
    let mut server = SearchServer::from_stop_words_text("and with")?;
    let texts = [
        "funny pet and nasty rat",
        "funny pet with curly hair",
        "funny pet and not very nasty rat",
        "pet with rat and rat and rat",
        "nasty rat with curly hair",
    ];
    for (i, text) in texts.iter().enumerate() {
        server.add_document(i as i32 + 1, text, DocumentStatus::Actual, &[1, 2])?;
    }
    Ok(server)
}

fn print_documents(documents: &[Document], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(documents)?);
    } else {
        for document in documents {
            println!("{document}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let server = sample_server()?;
    let queries = if cli.query.is_empty() {
        vec![
            "nasty rat -not".to_string(),
            "not very funny nasty pet".to_string(),
            "curly hair".to_string(),
        ]
    } else {
        cli.query
    };

    if cli.parallel {
        for query in &queries {
            tracing::info!(%query, "running parallel query");
            let documents = server.par_find_top_documents(query)?;
            print_documents(&documents, cli.json)?;
        }
    } else {
        let documents = process_queries_joined(&server, &queries)?;
        print_documents(&documents, cli.json)?;
    }
    Ok(())
}
