use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use lsim_params::{export, resolve, ParameterEntry, ParameterStore, Resolution, ResolveRequest};
use lsim_stage::StageConfig;

#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Parameter file to resolve.
    pub file: PathBuf,
    /// `-P<name>=<value>` overrides; they shadow entries of the file.
    ///
    /// Everything after the file is read as an override, so options go
    /// before it.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "OVERRIDES")]
    pub overrides: Vec<String>,
    /// Ignore command-line overrides.
    #[arg(long = "no-overrides")]
    pub no_overrides: bool,
    /// Print the effective entries as JSON.
    #[arg(long)]
    pub json: bool,
    /// Also write the full registry, with a provenance header, to this path.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

pub fn run(args: &ParamsArgs) -> Result<(), Box<dyn Error>> {
    if let Some(stray) = args.overrides.iter().find(|token| !token.starts_with("-P")) {
        return Err(format!(
            "`{stray}` after the parameter file is not a -P<name>=<value> override; \
             pass options before the file"
        )
        .into());
    }
    let mut store = ParameterStore::new();
    StageConfig::register_usage(&mut store);
    let mut argv = vec!["lsim params".to_string()];
    argv.extend(args.overrides.iter().cloned());
    let request = ResolveRequest::with_args(argv)
        .file(&args.file)
        .disable_overrides(args.no_overrides);
    if let Resolution::Help(text) = resolve(&mut store, &request)? {
        print!("{text}");
        return Ok(());
    }

    let effective = first_wins(store.entries());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&effective)?);
    } else {
        for entry in &effective {
            println!("{}\t{}", entry.name, entry.value);
        }
    }
    if let Some(path) = &args.export {
        let command: Vec<String> = std::env::args().collect();
        export(&store, path, &command)?;
    }
    Ok(())
}

/// Entries a lookup can actually return, in registry order.
fn first_wins(entries: &[ParameterEntry]) -> Vec<&ParameterEntry> {
    let mut seen = BTreeSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.name.as_str()))
        .collect()
}
