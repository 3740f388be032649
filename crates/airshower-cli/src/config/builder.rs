use super::defaults::{DEFAULT_INPUT_FILE, DefaultsConfig};
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::PlotArgs;
use crate::error::{CliError, Result};
use airshower::engine::config::DistributionConfigBuilder;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub fn build_config(args: &PlotArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let hist_file = file_config.histogram.take().unwrap_or_default();
    let side = args.side.or(hist_file.side).unwrap_or(defaults.side);
    let bins = args.bins.or(hist_file.bins).unwrap_or(defaults.bins);
    let coordinate_divisor = args.coordinate_divisor.or(hist_file.coordinate_divisor);

    let sel_file = file_config.selection.take().unwrap_or_default();
    let max_particles = args.max_particles.or(sel_file.max_particles);
    let observation_level = args
        .observation_level
        .or(sel_file.observation_level)
        .unwrap_or(defaults.observation_level);
    let merge_antiparticles = merge_flag(
        args.merge_antiparticles,
        sel_file.merge_antiparticles,
        defaults.merge_antiparticles,
    );
    let keep_muon_production = merge_flag(
        args.keep_muon_production,
        sel_file.keep_muon_production,
        defaults.keep_muon_production,
    );
    let use_weights = merge_flag(args.use_weights, sel_file.use_weights, defaults.use_weights);

    let mut builder = DistributionConfigBuilder::new()
        .side(side)
        .bins(bins)
        .max_particles(max_particles)
        .merge_antiparticles(merge_antiparticles)
        .observation_level(observation_level)
        .keep_muon_production(keep_muon_production)
        .use_weights(use_weights);
    if let Some(divisor) = coordinate_divisor {
        builder = builder.coordinate_divisor(divisor);
    }
    let distribution = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let input_path = resolve_input_path(
        args.input.as_deref(),
        file_config.input.as_deref(),
        args.data_dir.as_deref(),
    )?;
    let output_path = args
        .output
        .clone()
        .or(file_config.output)
        .unwrap_or(defaults.output);
    let csv_dir = args.csv_dir.clone().or(file_config.csv_dir);

    debug!("Resolved configuration: input {:?}, output {:?}", input_path, output_path);

    Ok(AppConfig {
        input_path,
        output_path,
        csv_dir,
        distribution,
    })
}

/// A flag given on the command line can only switch a feature on; otherwise the file decides.
fn merge_flag(cli_flag: bool, file_val: Option<bool>, default: bool) -> bool {
    cli_flag || file_val.unwrap_or(default)
}

/// Picks the input file: explicit argument, then config file, then
/// `<data-dir>/DAT000002-32` where the data directory falls back to the bundled `data/`.
pub fn resolve_input_path(
    cli_arg: Option<&Path>,
    file_arg: Option<&Path>,
    data_dir: Option<&Path>,
) -> Result<PathBuf> {
    let path = match cli_arg.or(file_arg) {
        Some(path) => path.to_path_buf(),
        None => {
            let data_dir = data_dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| DefaultsConfig::default().data_dir);
            data_dir.join(DEFAULT_INPUT_FILE)
        }
    };

    if !path.is_file() {
        return Err(CliError::Argument(format!(
            "Input file does not exist: {}.\nHint: pass a CORSIKA file, or point --data-dir (or AIRSHOWER_DATA_DIR) at a directory containing {}.",
            path.display(),
            DEFAULT_INPUT_FILE
        )));
    }
    Ok(path)
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "input" => config.input = Some(PathBuf::from(value_str)),
            "output" => config.output = Some(PathBuf::from(value_str)),
            "csv-dir" => config.csv_dir = Some(PathBuf::from(value_str)),
            "histogram.side" => {
                config.histogram.get_or_insert_with(Default::default).side =
                    Some(parse_value(key, value_str, "float")?);
            }
            "histogram.bins" => {
                config.histogram.get_or_insert_with(Default::default).bins =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "histogram.coordinate-divisor" => {
                config
                    .histogram
                    .get_or_insert_with(Default::default)
                    .coordinate_divisor = Some(parse_value(key, value_str, "float")?);
            }
            "selection.max-particles" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .max_particles = Some(parse_value(key, value_str, "integer")?);
            }
            "selection.observation-level" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .observation_level = Some(parse_value(key, value_str, "integer")?);
            }
            "selection.merge-antiparticles" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .merge_antiparticles = Some(parse_value(key, value_str, "boolean")?);
            }
            "selection.keep-muon-production" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .keep_muon_production = Some(parse_value(key, value_str, "boolean")?);
            }
            "selection.use-weights" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .use_weights = Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
