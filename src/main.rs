use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use fetchq::client::ApiClient;
use fetchq::config::{
    FetchConfig, ServiceConfig, DEFAULT_LIST_LIMIT, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT,
};
use fetchq::scheduler::{Job, JobId};
use fetchq::service::FetchService;
use fetchq::shutdown::install_shutdown_handler;
use fetchq::worker::HttpFetcher;

#[derive(Parser, Debug)]
#[command(name = "fetchq")]
#[command(version)]
#[command(about = "A URL fetch job queue with a bounded worker pool")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the fetchq service
    Server(ServerArgs),

    /// Job management commands
    Job {
        #[command(flatten)]
        client: ClientArgs,

        #[command(subcommand)]
        command: JobCommands,
    },
}

// =============================================================================
// Server Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ServerArgs {
    /// Host to bind the API to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the API to
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Jobs that may wait for a worker before submissions stall
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Number of concurrent fetch workers
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    workers: usize,

    /// Jobs returned by `GET /`
    #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
    list_limit: usize,

    /// Total timeout for a single fetch, in seconds
    #[arg(long, default_value = "300")]
    fetch_timeout_secs: u64,

    /// Time allowed for in-flight fetches on shutdown, in seconds
    #[arg(long, default_value = "10")]
    shutdown_grace_secs: u64,
}

// =============================================================================
// Client Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ClientArgs {
    /// Server address
    #[arg(long, short = 'a', default_value = "http://127.0.0.1:8080")]
    addr: String,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(clap::Subcommand, Debug)]
enum JobCommands {
    /// Submit a URL to fetch
    Submit {
        /// The URL to fetch (e.g., "https://example.com")
        url: String,
    },
    /// Get status of a specific job
    Status {
        /// The job ID
        job_id: JobId,
    },
    /// List the most recent jobs
    List,
}

// =============================================================================
// Server Implementation
// =============================================================================

async fn run_server(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let listen_addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let config = ServiceConfig {
        listen_addr,
        queue_capacity: args.queue_capacity,
        workers: args.workers,
        list_limit: args.list_limit,
        shutdown_grace: Duration::from_secs(args.shutdown_grace_secs),
        fetch: FetchConfig {
            timeout: Duration::from_secs(args.fetch_timeout_secs),
            ..FetchConfig::default()
        },
    };

    tracing::info!(
        listen_addr = %config.listen_addr,
        queue_capacity = config.queue_capacity,
        workers = config.workers,
        fetch_timeout_secs = args.fetch_timeout_secs,
        "Starting fetchq"
    );

    let fetcher = HttpFetcher::new(&config.fetch)?;
    let service = FetchService::new(config, fetcher)?;
    service.run(install_shutdown_handler()).await?;

    tracing::info!("fetchq stopped");
    Ok(())
}

// =============================================================================
// Client Command Handlers
// =============================================================================

fn print_job_table(jobs: &[Job]) {
    println!(
        "{:<8} {:<10} {:<6} {:<10} URL",
        "ID", "STATUS", "CODE", "LENGTH"
    );
    println!("{}", "-".repeat(60));
    for job in jobs {
        println!(
            "{:<8} {:<10} {:<6} {:<10} {}",
            job.id(),
            job.status().to_string(),
            job.response_status_code(),
            job.response_content_length(),
            job.url()
        );
    }
}

async fn handle_job_submit(
    client: &ApiClient,
    url: String,
    output_format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = client.submit(&url).await?;
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "id": id }))?);
        }
        OutputFormat::Table => {
            println!("Job submitted successfully!");
            println!("Job ID: {}", id);
        }
    }
    Ok(())
}

async fn handle_job_status(
    client: &ApiClient,
    job_id: JobId,
    output_format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let job = client.job(job_id).await?;
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&job)?),
        OutputFormat::Table => {
            println!("Job ID:         {}", job.id());
            println!("URL:            {}", job.url());
            println!("Status:         {}", job.status());
            println!("HTTP status:    {}", job.response_status_code());
            println!("Content length: {}", job.response_content_length());
            println!("Created:        {}", job.created_at().to_rfc3339());
            if let Some(completed_at) = job.completed_at() {
                println!("Completed:      {}", completed_at.to_rfc3339());
            }
        }
    }
    Ok(())
}

async fn handle_job_list(
    client: &ApiClient,
    output_format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = client.recent().await?;
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&jobs)?),
        OutputFormat::Table => {
            if jobs.is_empty() {
                println!("No jobs found");
            } else {
                print_job_table(&jobs);
            }
        }
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Server(server_args) => {
            run_server(server_args).await?;
        }
        Commands::Job { client, command } => {
            let api = ApiClient::new(client.addr.as_str());

            match command {
                JobCommands::Submit { url } => {
                    handle_job_submit(&api, url, &client.output).await?;
                }
                JobCommands::Status { job_id } => {
                    handle_job_status(&api, job_id, &client.output).await?;
                }
                JobCommands::List => {
                    handle_job_list(&api, &client.output).await?;
                }
            }
        }
    }

    Ok(())
}
