use anyhow::Result;
use gridprobe::Config;
use termimad::MadSkin;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_help_flag = true, disable_version_flag = true)]
pub struct Subcommand {
	#[command(subcommand)]
	topic: Topic,
}

#[derive(clap::Subcommand, Debug)]
enum Topic {
	/// Documented example of the YAML configuration file
	Config,
}

pub fn run(command: &Subcommand) -> Result<()> {
	let skin = MadSkin::default();

	match command.topic {
		Topic::Config => eprintln!("{}", skin.term_text(&config_docs())),
	}
	Ok(())
}

fn config_docs() -> String {
	format!(
		"# Configuration\n\nPass the file with `gridprobe serve -c <FILE>`. Every key is optional; \
		 command line arguments override file values.\n\n```yaml\n{}```\n",
		Config::demo_yaml()
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tests::run_command;

	#[test]
	fn config_topic() {
		run_command(vec!["gridprobe", "help", "config"]).unwrap();
	}

	#[test]
	fn docs_contain_every_section() {
		let docs = config_docs();
		for key in ["server:", "max_upload_bytes:", "cors:", "allowed_origins:", "thumbnail:", "png_speed:"] {
			assert!(docs.contains(key), "missing {key} in\n{docs}");
		}
		assert!(docs.ends_with("```\n"));
	}

	#[test]
	fn unknown_topic() {
		assert!(run_command(vec!["gridprobe", "help", "composer"]).is_err());
	}
}
