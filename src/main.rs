//! Skill matcher: semantic skill extraction for CVs and job offers

use clap::Parser;
use log::{error, info, warn};
use skill_matcher::bio::{BioGenerator, BioRequest, OllamaBioGenerator};
use skill_matcher::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use skill_matcher::config::{Config, OutputFormat};
use skill_matcher::input::InputManager;
use skill_matcher::output::{save_report_to_file, AnalysisReport, ReportBody, ReportGenerator};
use skill_matcher::processing::analyzer::SkillAnalyzer;
use skill_matcher::processing::embedding_manager::EmbeddingModelManager;
use skill_matcher::{Result, SkillMatcherError};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli, config, config_path).await {
        error!("Command failed: {}", e);
        if e.is_fatal() {
            error!("The embedding model could not be loaded; check `skill-matcher models list`");
        }
        process::exit(1);
    }
}

/// Render a report in the requested format, print it, and save it when asked.
fn emit(cli: &Cli, config: &Config, report: &AnalysisReport) -> Result<()> {
    let format = output_format(cli, config)?;
    let use_colors = config.output.color_output && cli.save.is_none();
    let generator = ReportGenerator::with_options(use_colors, true, true);
    let rendered = generator.generate_report(report, format)?;

    match &cli.save {
        Some(path) => {
            save_report_to_file(&rendered, path)?;
            info!("Saved output to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn output_format(cli: &Cli, config: &Config) -> Result<OutputFormat> {
    match &cli.output {
        Some(format) => cli::parse_output_format(format).map_err(SkillMatcherError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn check_extension(path: &Path, allowed: &[&str], what: &str) -> Result<()> {
    cli::validate_file_extension(path, allowed)
        .map_err(|e| SkillMatcherError::InvalidInput(format!("{} file: {}", what, e)))
}

async fn run_command(cli: Cli, mut config: Config, config_path: PathBuf) -> Result<()> {
    let params = cli.scoring_params(&config.scoring);

    match &cli.command {
        Commands::AnalyzeText { text, file } => {
            let mut input_manager = InputManager::new();
            let (text, source) = match (text, file) {
                (Some(text), _) => (text.clone(), None),
                (None, Some(path)) => {
                    check_extension(path, &["txt", "md", "markdown"], "Text")?;
                    (input_manager.read_text(path).await?, Some(path.display().to_string()))
                }
                (None, None) => {
                    return Err(SkillMatcherError::InvalidInput("Provide a text or --file".to_string()))
                }
            };

            let analyzer = SkillAnalyzer::from_config(&config).await?;
            let skills = analyzer.analyze_text(&text, &params)?;
            info!("Detected {} skills", skills.len());

            let mut report = AnalysisReport::new("Skills in text", ReportBody::Ranked(skills))
                .with_model(analyzer.stats().model_name)
                .with_params(params);
            if let Some(source) = source {
                report = report.with_source(source);
            }
            emit(&cli, &config, &report)?;
        }

        Commands::AnalyzeOffer { offer, max_results } => {
            check_extension(offer, &["json"], "Job offer")?;
            let job_offer = InputManager::new().load_job_offer(offer).await?;

            let analyzer = SkillAnalyzer::from_config(&config).await?;
            let max_results = max_results.or(config.scoring.max_results_per_category);
            let result = analyzer.analyze_job_offer(&job_offer, &params, max_results)?;
            info!("Job offer analysis found {} skills", result.len());

            let report = AnalysisReport::new("Job offer skills", ReportBody::Skills(result))
                .with_source(offer.display().to_string())
                .with_model(analyzer.stats().model_name)
                .with_params(params);
            emit(&cli, &config, &report)?;
        }

        Commands::AnalyzeTexts { files, max_results } => {
            let mut input_manager = InputManager::new();
            let mut texts = Vec::with_capacity(files.len());
            for path in files {
                check_extension(path, &["txt", "md", "markdown"], "Text")?;
                let text = input_manager.read_text(path).await?;
                if text.trim().is_empty() {
                    warn!("Skipping empty text: {}", path.display());
                    continue;
                }
                texts.push(text);
            }

            let analyzer = SkillAnalyzer::from_config(&config).await?;
            let max_results = max_results.or(config.scoring.max_results_per_category);
            let result = analyzer.analyze_texts(&texts, &params, max_results)?;

            let sources: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
            let report = AnalysisReport::new("Skills across texts", ReportBody::Skills(result))
                .with_source(sources.join(", "))
                .with_model(analyzer.stats().model_name)
                .with_params(params);
            emit(&cli, &config, &report)?;
        }

        Commands::AnalyzeCv { cv, min_score } => {
            check_extension(cv, &["json"], "CV")?;
            let user_cv = InputManager::new().load_cv(cv).await?;

            let analyzer = SkillAnalyzer::from_config(&config).await?;
            let min_score = min_score.unwrap_or(config.scoring.min_score);
            let annotated = analyzer.analyze_cv(&user_cv, &params, min_score)?;

            let report = AnalysisReport::new("Annotated CV", ReportBody::Cv(Box::new(annotated)))
                .with_source(cv.display().to_string())
                .with_model(analyzer.stats().model_name)
                .with_params(params);
            emit(&cli, &config, &report)?;
        }

        Commands::GenerateBio {
            cv,
            offer,
            skills,
            language,
        } => {
            check_extension(cv, &["json"], "CV")?;
            check_extension(offer, &["json"], "Job offer")?;

            let mut input_manager = InputManager::new();
            let user_cv = input_manager.load_cv(cv).await?;
            let job_offer = input_manager.load_job_offer(offer).await?;

            let skill_result = match skills {
                Some(path) => {
                    check_extension(path, &["json"], "Skill result")?;
                    input_manager.load_skill_result(path).await?
                }
                None => {
                    info!("No skill result given, analyzing the job offer first");
                    let analyzer = SkillAnalyzer::from_config(&config).await?;
                    analyzer.analyze_job_offer(&job_offer, &params, config.scoring.max_results_per_category)?
                }
            };

            let request = BioRequest {
                user_cv,
                skill_result,
                job_offer,
                language: language.clone(),
            };

            let generator = OllamaBioGenerator::new(&config.bio)?;
            info!("Generating bio with {} at {}", config.bio.model, config.bio.endpoint);
            let bio = generator.generate(&request).await?;

            let report = AnalysisReport::new("Candidate bio", ReportBody::Bio(bio)).with_model(config.bio.model.clone());
            emit(&cli, &config, &report)?;
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("Embedding models (directory: {}):", config.models_dir().display());
                    for (id, model) in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(id) { "downloaded" } else { "available" };
                        let marker = if id == config.models.embedding_model { "*" } else { " " };
                        println!(
                            "{} {:<26} {:<40} {:>4} MB  {:>4}d  [{}]",
                            marker, id, model.repo_id, model.size_mb, model.dimensions, status
                        );
                        println!("    {}", model.description);
                    }
                }

                ModelAction::Download { model, force } => {
                    let model_id = manager
                        .resolve_model_id(model)
                        .ok_or_else(|| SkillMatcherError::ModelNotFound(model.clone()))?;

                    if !force && manager.is_model_downloaded(&model_id) {
                        println!("Model '{}' is already downloaded. Use --force to re-download.", model_id);
                        return Ok(());
                    }

                    let model_path = manager.download_model(&model_id, *force).await?;
                    println!("Model '{}' downloaded to {}", model_id, model_path.display());
                }

                ModelAction::Info { model } => {
                    let model_id = manager
                        .resolve_model_id(model)
                        .ok_or_else(|| SkillMatcherError::ModelNotFound(model.clone()))?;
                    let info = manager
                        .get_model_info(&model_id)
                        .ok_or_else(|| SkillMatcherError::ModelNotFound(model_id.clone()))?;

                    println!("Id: {}", model_id);
                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Size: {} MB", info.size_mb);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Description: {}", info.description);
                    match manager.get_model_path(&model_id) {
                        Some(path) => println!("Status: downloaded ({})", path.display()),
                        None => println!("Status: available, run `skill-matcher models download {}`", model_id),
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| SkillMatcherError::Configuration(e.to_string()))?;
                println!("# {}\n{}", config_path.display(), rendered);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("Configuration reset to defaults: {}", config_path.display());
            }

            Some(ConfigAction::Set { key, value }) => {
                config.set_value(key, value)?;
                config.save_to(&config_path)?;
                println!("Set {} = {}", key, value);
            }
        },
    }

    Ok(())
}
