use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::PredictArgs;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, NameKind};
use bioact::core::io::export::ExportConfig;
use bioact::engine::config::{DescriptorToolConfig, PipelineConfigBuilder, padel_launcher_args};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub fn build_config(args: &PredictArgs, data_manager: &DataManager) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let tool_file = file_config.descriptor_tool.take().unwrap_or_default();
    let model_file = file_config.model.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    // A target named on the command line outranks paths from the file.
    let model_ref = args
        .model
        .as_deref()
        .or(args.target.as_deref())
        .or(model_file.model_path.as_deref())
        .or(file_config.target.as_deref())
        .ok_or_else(|| missing_model_error("model"))?;
    let schema_ref = args
        .schema
        .as_deref()
        .or(args.target.as_deref())
        .or(model_file.schema_path.as_deref())
        .or(file_config.target.as_deref())
        .ok_or_else(|| missing_model_error("descriptor list"))?;

    let model_path = resolve_path_or_logical_name(model_ref, NameKind::Model, data_manager)?;
    let schema_path = resolve_path_or_logical_name(schema_ref, NameKind::Schema, data_manager)?;
    let jar_path = resolve_path_or_logical_name(
        tool_file.padel_jar.as_deref().unwrap_or(&defaults.padel_jar),
        NameKind::PadelJar,
        data_manager,
    )?;
    let descriptor_types_path = resolve_path_or_logical_name(
        tool_file
            .fingerprint
            .as_deref()
            .unwrap_or(&defaults.fingerprint),
        NameKind::Fingerprint,
        data_manager,
    )?;

    let heap = tool_file.heap.unwrap_or(defaults.heap);
    validate_heap(&heap)?;

    let mut tool = DescriptorToolConfig::padel(jar_path.clone(), descriptor_types_path);
    tool.program = PathBuf::from(tool_file.program.unwrap_or(defaults.program));
    tool.launcher_args = padel_launcher_args(&jar_path, &heap);
    tool.remove_salt = tool_file.remove_salt.unwrap_or(defaults.remove_salt);
    tool.standardize_nitro = tool_file
        .standardize_nitro
        .unwrap_or(defaults.standardize_nitro);
    tool.fingerprints = tool_file.fingerprints.unwrap_or(defaults.fingerprints);

    let timeout_secs = args
        .timeout_secs
        .or(tool_file.timeout_secs)
        .unwrap_or(defaults.timeout_secs);
    let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
    let keep_intermediates = args.keep_intermediates
        || tool_file
            .keep_intermediates
            .unwrap_or(defaults.keep_intermediates);

    let export = ExportConfig {
        file_name: output_file.file_name.unwrap_or(defaults.file_name),
        name_column: output_file.name_column.unwrap_or(defaults.name_column),
        score_column: output_file.score_column.unwrap_or(defaults.score_column),
    };

    let core_config = PipelineConfigBuilder::new()
        .descriptor_tool(tool)
        .schema_path(schema_path)
        .model_path(model_path)
        .timeout(timeout)
        .work_root(tool_file.work_dir)
        .keep_intermediates(keep_intermediates)
        .export(export)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!("Final pipeline configuration: {:?}", &core_config);

    let output_template = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&core_config.export.file_name));

    Ok(AppConfig {
        inputs: args.inputs.clone(),
        output_template,
        descriptors_out: args.descriptors_out.clone(),
        subset_out: args.subset_out.clone(),
        print_link: args.print_link,
        core_config,
    })
}

fn missing_model_error(what: &str) -> CliError {
    CliError::Config(format!(
        "No {} configured. Pass --target (or --model/--schema), or set `target` in the config file.",
        what
    ))
}

fn resolve_path_or_logical_name(
    name_or_path: &str,
    kind: NameKind,
    data_manager: &DataManager,
) -> Result<PathBuf> {
    let path = Path::new(name_or_path);
    if path.is_absolute() || name_or_path.contains(['/', '\\']) || path.is_file() {
        if !path.exists() {
            return Err(CliError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Provided path does not exist: {}", name_or_path),
            )));
        }
        return Ok(path.to_path_buf());
    }

    let parsed_name = parser::parse_logical_name(name_or_path, kind)
        .map_err(|e| CliError::Argument(e.to_string()))?;

    let resolved = data_manager.resolve_logical_name(&parsed_name);
    if !resolved.exists() {
        return Err(CliError::Data(format!(
            "Resolved data file does not exist: {:?}.\nHint: Run 'bioact data path' to see where data files are expected, and 'bioact data targets' to list installed targets.",
            resolved
        )));
    }
    Ok(resolved)
}

/// Accepts JVM heap sizes such as `2G`, `512m` or `1048576`.
fn validate_heap(heap: &str) -> Result<()> {
    let digits = heap.trim_end_matches(['k', 'K', 'm', 'M', 'g', 'G']);
    let valid = !digits.is_empty()
        && heap.len() - digits.len() <= 1
        && digits.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(CliError::Config(format!(
            "Invalid heap size '{}'. Expected a number with an optional k/m/g suffix (e.g., 2G).",
            heap
        )))
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let value = value_str.to_string();

        match key {
            "target" => config.target = Some(value),
            "model.model-path" => {
                config.model.get_or_insert_with(Default::default).model_path = Some(value);
            }
            "model.schema-path" => {
                config.model.get_or_insert_with(Default::default).schema_path = Some(value);
            }
            "output.file-name" => {
                config.output.get_or_insert_with(Default::default).file_name = Some(value);
            }
            "output.name-column" => {
                config.output.get_or_insert_with(Default::default).name_column = Some(value);
            }
            "output.score-column" => {
                config.output.get_or_insert_with(Default::default).score_column = Some(value);
            }
            _ => {
                let Some(tool_key) = key.strip_prefix("descriptor-tool.") else {
                    return Err(unsupported_key(key));
                };
                let tool = config.descriptor_tool.get_or_insert_with(Default::default);
                match tool_key {
                    "program" => tool.program = Some(value),
                    "padel-jar" => tool.padel_jar = Some(value),
                    "fingerprint" => tool.fingerprint = Some(value),
                    "heap" => tool.heap = Some(value),
                    "work-dir" => tool.work_dir = Some(PathBuf::from(value)),
                    "remove-salt" => tool.remove_salt = Some(parse_value(key, value_str, "boolean")?),
                    "standardize-nitro" => {
                        tool.standardize_nitro = Some(parse_value(key, value_str, "boolean")?)
                    }
                    "fingerprints" => {
                        tool.fingerprints = Some(parse_value(key, value_str, "boolean")?)
                    }
                    "keep-intermediates" => {
                        tool.keep_intermediates = Some(parse_value(key, value_str, "boolean")?)
                    }
                    "timeout-secs" => {
                        tool.timeout_secs = Some(parse_value(key, value_str, "integer")?)
                    }
                    _ => return Err(unsupported_key(key)),
                }
            }
        }
    }
    Ok(config)
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn setup_mock_data_tree() -> (DataManager, PathBuf, TempDir) {
        let tmp = tempdir().expect("create temp dir");
        let base = tmp.path().join("data");

        fs::create_dir_all(base.join("targets/acetylcholinesterase")).unwrap();
        fs::create_dir_all(base.join("targets/bace1")).unwrap();
        fs::create_dir_all(base.join("padel")).unwrap();

        for target in ["acetylcholinesterase", "bace1"] {
            fs::write(base.join(format!("targets/{}/model.json", target)), b"{}").unwrap();
            fs::write(
                base.join(format!("targets/{}/descriptor_list.csv", target)),
                b"PubchemFP0\n",
            )
            .unwrap();
        }
        fs::write(base.join("padel/PaDEL-Descriptor.jar"), b"").unwrap();
        fs::write(base.join("padel/PubchemFingerprinter.xml"), b"").unwrap();
        fs::write(base.join("padel/MACCSFingerprinter.xml"), b"").unwrap();

        let manager = DataManager::with_custom_path(base.clone());
        (manager, base, tmp)
    }

    fn base_predict_args() -> PredictArgs {
        PredictArgs {
            inputs: vec![PathBuf::from("molecules.txt")],
            output: None,
            config: None,
            target: Some("acetylcholinesterase".to_string()),
            model: None,
            schema: None,
            timeout_secs: None,
            keep_intermediates: false,
            descriptors_out: None,
            subset_out: None,
            print_link: false,
            set_values: vec![],
        }
    }

    #[test]
    fn target_and_defaults_resolve_against_the_data_directory() {
        let (manager, base, _tmp) = setup_mock_data_tree();
        let args = base_predict_args();

        let app = build_config(&args, &manager).expect("build ok");
        let cfg = app.core_config;

        assert_eq!(
            cfg.model_path,
            base.join("targets/acetylcholinesterase/model.json")
        );
        assert_eq!(
            cfg.schema_path,
            base.join("targets/acetylcholinesterase/descriptor_list.csv")
        );
        assert_eq!(
            cfg.tool.descriptor_types_path,
            base.join("padel/PubchemFingerprinter.xml")
        );
        assert_eq!(cfg.tool.program, PathBuf::from("java"));
        assert_eq!(
            cfg.tool.launcher_args.last().map(String::as_str),
            Some(base.join("padel/PaDEL-Descriptor.jar").to_str().unwrap())
        );
        assert!(cfg.tool.launcher_args.contains(&"-Xmx2G".to_string()));
        assert_eq!(cfg.tool.timeout, Some(Duration::from_secs(1800)));
        assert!(!cfg.tool.keep_intermediates);
        assert_eq!(cfg.export, ExportConfig::default());
        assert_eq!(app.output_template, PathBuf::from("prediction.csv"));
    }

    #[test]
    fn file_values_are_merged() {
        let (manager, base, _tmp) = setup_mock_data_tree();
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        let toml = r#"
            target = "bace1"

            [descriptor-tool]
            fingerprint = "maccs"
            heap = "4G"
            standardize-nitro = false
            timeout-secs = 0
            keep-intermediates = true

            [output]
            file-name = "bace1_predictions.csv"
            score-column = "predicted_pIC50"
            "#;
        fs::write(&cfg_path, toml).unwrap();

        let mut args = base_predict_args();
        args.target = None;
        args.config = Some(cfg_path);

        let app = build_config(&args, &manager).expect("build ok");
        let cfg = app.core_config;

        assert_eq!(cfg.model_path, base.join("targets/bace1/model.json"));
        assert_eq!(
            cfg.tool.descriptor_types_path,
            base.join("padel/MACCSFingerprinter.xml")
        );
        assert!(cfg.tool.launcher_args.contains(&"-Xms4G".to_string()));
        assert!(!cfg.tool.standardize_nitro);
        assert!(cfg.tool.remove_salt);
        assert_eq!(cfg.tool.timeout, None);
        assert!(cfg.tool.keep_intermediates);
        assert_eq!(cfg.export.score_column, "predicted_pIC50");
        assert_eq!(cfg.export.name_column, "molecule_name");
        assert_eq!(app.output_template, PathBuf::from("bace1_predictions.csv"));
    }

    #[test]
    fn cli_overrides_file_values() {
        let (manager, base, _tmp) = setup_mock_data_tree();
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        fs::write(
            &cfg_path,
            "target = \"bace1\"\n[descriptor-tool]\ntimeout-secs = 60\n",
        )
        .unwrap();

        let mut args = base_predict_args();
        args.config = Some(cfg_path);
        args.timeout_secs = Some(5);
        args.keep_intermediates = true;
        args.output = Some(PathBuf::from("out/ache.csv"));

        let app = build_config(&args, &manager).expect("build ok");
        let cfg = app.core_config;

        assert_eq!(
            cfg.model_path,
            base.join("targets/acetylcholinesterase/model.json")
        );
        assert_eq!(cfg.tool.timeout, Some(Duration::from_secs(5)));
        assert!(cfg.tool.keep_intermediates);
        assert_eq!(app.output_template, PathBuf::from("out/ache.csv"));
    }

    #[test]
    fn explicit_model_and_schema_paths_are_used_verbatim() {
        let (manager, _base, _tmp) = setup_mock_data_tree();
        let dir = tempdir().unwrap();
        let model = dir.path().join("custom.json");
        let schema = dir.path().join("custom.csv");
        fs::write(&model, "{}").unwrap();
        fs::write(&schema, "A\n").unwrap();

        let mut args = base_predict_args();
        args.model = Some(model.to_string_lossy().to_string());
        args.schema = Some(schema.to_string_lossy().to_string());

        let cfg = build_config(&args, &manager).expect("build ok").core_config;
        assert_eq!(cfg.model_path, model);
        assert_eq!(cfg.schema_path, schema);
    }

    #[test]
    fn set_values_override_file() {
        let (manager, _base, _tmp) = setup_mock_data_tree();
        let mut args = base_predict_args();
        args.set_values = vec![
            "descriptor-tool.heap=512m".to_string(),
            "descriptor-tool.remove-salt=false".to_string(),
            "descriptor-tool.timeout-secs=90".to_string(),
            "descriptor-tool.program=/usr/lib/jvm/bin/java".to_string(),
            "output.name-column=compound".to_string(),
        ];

        let cfg = build_config(&args, &manager).expect("build ok").core_config;

        assert!(cfg.tool.launcher_args.contains(&"-Xmx512m".to_string()));
        assert!(!cfg.tool.remove_salt);
        assert_eq!(cfg.tool.timeout, Some(Duration::from_secs(90)));
        assert_eq!(cfg.tool.program, PathBuf::from("/usr/lib/jvm/bin/java"));
        assert_eq!(cfg.export.name_column, "compound");
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        let (manager, _base, _tmp) = setup_mock_data_tree();
        for bad in [
            "no-equals-sign",
            "descriptor-tool.bogus=1",
            "optimization.num-solutions=2",
            "descriptor-tool.fingerprints=maybe",
        ] {
            let mut args = base_predict_args();
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&args, &manager), Err(CliError::Config(_))),
                "expected rejection of {}",
                bad
            );
        }
    }

    #[test]
    fn missing_target_is_a_config_error() {
        let (manager, _base, _tmp) = setup_mock_data_tree();
        let mut args = base_predict_args();
        args.target = None;

        assert!(matches!(
            build_config(&args, &manager),
            Err(CliError::Config(msg)) if msg.contains("--target")
        ));
    }

    #[test]
    fn uninstalled_target_points_at_the_data_directory() {
        let (manager, _base, _tmp) = setup_mock_data_tree();
        let mut args = base_predict_args();
        args.target = Some("dopamine-d2".to_string());

        assert!(matches!(
            build_config(&args, &manager),
            Err(CliError::Data(msg)) if msg.contains("dopamine-d2")
        ));
    }

    #[test]
    fn unknown_fingerprint_is_an_argument_error() {
        let (manager, _base, _tmp) = setup_mock_data_tree();
        let mut args = base_predict_args();
        args.set_values = vec!["descriptor-tool.fingerprint=morgan".to_string()];

        assert!(matches!(
            build_config(&args, &manager),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn heap_sizes_are_validated() {
        assert!(validate_heap("2G").is_ok());
        assert!(validate_heap("512m").is_ok());
        assert!(validate_heap("1048576").is_ok());
        assert!(validate_heap("").is_err());
        assert!(validate_heap("G").is_err());
        assert!(validate_heap("2GB").is_err());
        assert!(validate_heap("two").is_err());
    }
}
