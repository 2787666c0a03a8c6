use anyhow::Result;
use gridprobe::{Config, server::ProbeServer};
use std::path::PathBuf;
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Path to a configuration file (YAML) for the server, CORS and thumbnail settings.
	/// Run "gridprobe help config" for a documented example.
	/// Command line arguments override configuration file settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0, verbatim_doc_comment)]
	pub config: Option<PathBuf>,

	/// Serve via socket ip. Default: 127.0.0.1
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8000
	#[arg(short, long, display_order = 0)]
	pub port: Option<u16>,

	/// Maximum size of an upload in bytes. Default: 67108864
	#[arg(long, value_name = "BYTES", display_order = 1)]
	pub max_upload_bytes: Option<usize>,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 4)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = if let Some(config_path) = &arguments.config {
		Config::from_path(config_path)?
	} else {
		Config::default()
	};

	config.server.override_optional_ip(arguments.ip.as_deref());
	config.server.override_optional_port(arguments.port);
	config.server.override_optional_max_upload_bytes(arguments.max_upload_bytes);

	let mut server = ProbeServer::from_config(&config)?;
	server.start().await?;

	if let Some(addr) = server.local_addr() {
		eprintln!("   http://{addr}/attributes  <-  POST image_file");
		eprintln!("   http://{addr}/thumbnail   <-  POST image [resolution]");
	}

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
	} else {
		loop {
			sleep(Duration::from_secs(60)).await;
		}
	}

	server.stop().await;

	Ok(())
}
