use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileVisualizationConfig};
use super::models::AppConfig;
use crate::cli::CompareArgs;
use crate::error::{CliError, Result};
use droidspp::core::io::chimerax::ViewerStyle;
use droidspp::engine::config::{AnalysisConfigBuilder, ReducedDimension, VisualizationConfig};
use std::path::PathBuf;
use std::str::FromStr;

pub fn build_config(args: &CompareArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let file_config = apply_cli_flags(file_config, args);
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let features = file_config.features.take().unwrap_or_default();
    let divergence = file_config.divergence.take().unwrap_or_default();
    let discrepancy = file_config.discrepancy.take().unwrap_or_default();
    let visualization = merge_visualization(file_config.visualization.take(), &defaults);

    let mut builder = AnalysisConfigBuilder::new()
        .input_root(
            file_config
                .input_dir
                .unwrap_or_else(|| PathBuf::from(defaults.input_dir)),
        )
        .seed(discrepancy.seed)
        .visualization(visualization);

    if let Some(dir) = file_config.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(id) = file_config.reference_id {
        builder = builder.reference_id(id);
    }
    if let Some(id) = file_config.query_id {
        builder = builder.query_id(id);
    }
    if let Some(length) = file_config.length {
        builder = builder.protein_length(length);
    }
    if let Some(subsamples) = file_config.subsamples {
        builder = builder.subsamples(subsamples);
    }

    match (features.dimension, features.dimension_fraction) {
        (Some(k), _) => builder = builder.reduced_dimension(ReducedDimension::Fixed(k)),
        (None, Some(f)) => builder = builder.reduced_dimension(ReducedDimension::Fraction(f)),
        (None, None) => {}
    }
    if let Some(threshold) = features.sparsity_threshold {
        builder = builder.sparsity_threshold(threshold);
    }
    if let Some(include) = features.include_flux {
        builder = builder.include_flux(include);
    }
    if let Some(persist) = features.persist {
        builder = builder.persist_features(persist);
    }

    if let Some(enabled) = divergence.enabled {
        builder = builder.divergence_enabled(enabled);
    }
    if let Some(measure) = divergence.measure {
        builder = builder.divergence_measure(measure);
    }
    if let Some(alpha) = divergence.family_alpha {
        builder = builder.family_alpha(alpha);
    }

    if let Some(enabled) = discrepancy.enabled {
        builder = builder.discrepancy_enabled(enabled);
    }
    if let Some(gamma) = discrepancy.gamma {
        builder = builder.gamma(gamma);
    }
    if let Some(resamples) = discrepancy.resamples {
        builder = builder.resamples(resamples);
    }
    if let Some(cutoff) = discrepancy.cutoff {
        builder = builder.discrepancy_cutoff(cutoff);
    }

    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        source: args.config.clone(),
        core_config,
    })
}

fn merge_visualization(
    file_val: Option<FileVisualizationConfig>,
    defaults: &DefaultsConfig,
) -> VisualizationConfig {
    let file_val = file_val.unwrap_or_default();
    let style = ViewerStyle::default();
    VisualizationConfig {
        write_attributes: file_val
            .write_attributes
            .unwrap_or(defaults.write_attributes),
        launch_viewer: file_val.launch_viewer.unwrap_or(defaults.launch_viewer),
        chimerax_dir: file_val.chimerax_dir,
        style: ViewerStyle {
            lighting: file_val.lighting.unwrap_or(style.lighting),
            transparency: file_val.transparency.unwrap_or(style.transparency),
            background: file_val.background.unwrap_or(style.background),
        },
    }
}

fn apply_cli_flags(mut config: FileConfig, args: &CompareArgs) -> FileConfig {
    if let Some(dir) = &args.input_dir {
        config.input_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.output {
        config.output_dir = Some(dir.clone());
    }
    if let Some(id) = &args.reference_id {
        config.reference_id = Some(id.clone());
    }
    if let Some(id) = &args.query_id {
        config.query_id = Some(id.clone());
    }
    if let Some(length) = args.length {
        config.length = Some(length);
    }
    if let Some(subsamples) = args.subsamples {
        config.subsamples = Some(subsamples);
    }
    if let Some(seed) = args.seed {
        config.discrepancy_mut().seed = Some(seed);
    }
    if let Some(measure) = args.measure {
        config.divergence_mut().measure = Some(measure);
    }
    if args.no_divergence {
        config.divergence_mut().enabled = Some(false);
    }
    if args.no_discrepancy {
        config.discrepancy_mut().enabled = Some(false);
    }
    if args.include_flux {
        config.features_mut().include_flux = Some(true);
    }
    if args.persist_features {
        config.features_mut().persist = Some(true);
    }
    if args.no_attributes {
        config.visualization_mut().write_attributes = Some(false);
    }
    if args.launch_viewer {
        config.visualization_mut().launch_viewer = Some(true);
    }
    if let Some(dir) = &args.chimerax_dir {
        config.visualization_mut().chimerax_dir = Some(dir.clone());
    }
    config
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            "input-dir" => config.input_dir = Some(PathBuf::from(value)),
            "output-dir" => config.output_dir = Some(PathBuf::from(value)),
            "reference-id" => config.reference_id = Some(value.to_string()),
            "query-id" => config.query_id = Some(value.to_string()),
            "length" => config.length = Some(parse_value(key, value)?),
            "subsamples" => config.subsamples = Some(parse_value(key, value)?),
            "features.dimension" => config.features_mut().dimension = Some(parse_value(key, value)?),
            "features.dimension-fraction" => {
                let features = config.features_mut();
                features.dimension = None;
                features.dimension_fraction = Some(parse_value(key, value)?);
            }
            "features.sparsity-threshold" => {
                config.features_mut().sparsity_threshold = Some(parse_value(key, value)?)
            }
            "features.include-flux" => {
                config.features_mut().include_flux = Some(parse_value(key, value)?)
            }
            "features.persist" => config.features_mut().persist = Some(parse_value(key, value)?),
            "divergence.enabled" => config.divergence_mut().enabled = Some(parse_value(key, value)?),
            "divergence.measure" => config.divergence_mut().measure = Some(parse_value(key, value)?),
            "divergence.family-alpha" => {
                config.divergence_mut().family_alpha = Some(parse_value(key, value)?)
            }
            "discrepancy.enabled" => {
                config.discrepancy_mut().enabled = Some(parse_value(key, value)?)
            }
            "discrepancy.gamma" => config.discrepancy_mut().gamma = Some(parse_value(key, value)?),
            "discrepancy.resamples" => {
                config.discrepancy_mut().resamples = Some(parse_value(key, value)?)
            }
            "discrepancy.cutoff" => config.discrepancy_mut().cutoff = Some(parse_value(key, value)?),
            "discrepancy.seed" => config.discrepancy_mut().seed = Some(parse_value(key, value)?),
            "visualization.write-attributes" => {
                config.visualization_mut().write_attributes = Some(parse_value(key, value)?)
            }
            "visualization.launch-viewer" => {
                config.visualization_mut().launch_viewer = Some(parse_value(key, value)?)
            }
            "visualization.chimerax-dir" => {
                config.visualization_mut().chimerax_dir = Some(PathBuf::from(value))
            }
            "visualization.lighting" => {
                config.visualization_mut().lighting = Some(value.to_string())
            }
            "visualization.transparency" => {
                config.visualization_mut().transparency = Some(parse_value(key, value)?)
            }
            "visualization.background" => {
                config.visualization_mut().background = Some(value.to_string())
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
