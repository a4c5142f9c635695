use clap::Parser;
use std::path::PathBuf;

use crate::Opts;

/// Stream a large text file to an uppercased copy, chunk by chunk.
#[derive(Clone, Debug, Parser)]
#[command(name = "capsflow")]
#[command(about = "Uppercase a large text file chunk by chunk, reporting progress and elapsed time.")]
pub struct Cli {
    /// File to read. Default: `large-input.txt` (or `input` from .capsflow.toml).
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// File to write. Default: `large-output.txt` (or `output` from .capsflow.toml).
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Verbose output: debug logging and a progress bar.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Write to a temp file next to OUTPUT and rename it into place on success.
    #[arg(long, short = 'a', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub atomic: Option<bool>,

    /// Print the run summary as JSON on stdout.
    #[arg(long, short = 'j', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,

    /// Write a sample input of this many MiB to INPUT and exit (default 10000).
    #[arg(long, value_name = "MIB", num_args = 0..=1, default_missing_value = "10000", value_parser = clap::value_parser!(u64))]
    pub generate_mib: Option<u64>,
}

/// Overwrite opts field from a flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $cli.$field.clone() {
            $opts.$field = v;
        }
    };
}

impl Cli {
    /// Apply flags on top of `opts` (defaults + config file). Only given flags override.
    pub fn apply_to_opts(&self, opts: &mut Opts) {
        apply_cli_opt!(self, opts, input);
        apply_cli_opt!(self, opts, output);
        apply_cli_opt!(self, opts, verbose);
        apply_cli_opt!(self, opts, atomic);
        apply_cli_opt!(self, opts, json);
        if self.generate_mib.is_some() {
            opts.generate_mib = self.generate_mib;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::SampleInputConsts;

    #[test]
    fn test_generate_flag_without_value_uses_default_size() {
        let cli = Cli::try_parse_from(["capsflow", "--generate-mib"]).unwrap();
        assert_eq!(cli.generate_mib, Some(SampleInputConsts::DEFAULT_SIZE_MIB));
    }

    #[test]
    fn test_positional_paths_and_flags() {
        let cli = Cli::try_parse_from(["capsflow", "in.txt", "out.txt", "-v", "--atomic"]).unwrap();
        let mut opts = Opts::default();
        cli.apply_to_opts(&mut opts);
        assert_eq!(opts.input, PathBuf::from("in.txt"));
        assert_eq!(opts.output, PathBuf::from("out.txt"));
        assert!(opts.verbose);
        assert!(opts.atomic);
        assert!(!opts.json);
    }

    #[test]
    fn test_explicit_false_overrides_config() {
        let cli = Cli::try_parse_from(["capsflow", "--atomic", "false"]).unwrap();
        let mut opts = Opts {
            atomic: true,
            ..Opts::default()
        };
        cli.apply_to_opts(&mut opts);
        assert!(!opts.atomic);
    }
}
