//! resume-fit: resume and job description fit prediction

use clap::Parser;
use log::{error, info};
use resume_fit::classifier::dataset::load_dataset;
use resume_fit::classifier::training::Trainer;
use resume_fit::cli::{self, Cli, Commands, ConfigAction, InputArgs, ModelAction};
use resume_fit::config::Config;
use resume_fit::error::{Result, ResumeFitError};
use resume_fit::input::manager::require_both;
use resume_fit::input::{InputManager, InputSource};
use resume_fit::output::{save_report_to_file, suggest_filename, FitReport, ReportGenerator};
use resume_fit::processing::analyzer::FitAnalyzer;
use resume_fit::processing::embedding_manager::EmbeddingModelManager;
use resume_fit::processing::embeddings::EmbeddingEngine;
use resume_fit::processing::predictor::WeakLabeler;
use resume_fit::processing::reconciler::FitReconciler;
use resume_fit::processing::skills::SkillExtractor;
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Match {
            input,
            output,
            save,
            detailed,
            lexical,
            embedding,
        } => {
            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeFitError::InvalidInput)?,
                None => config.output.format,
            };

            let (resume_source, resume_text, job_source, job_text) = read_inputs(&input).await?;

            let analyzer = if lexical {
                FitAnalyzer::lexical(&config)?
            } else {
                FitAnalyzer::from_config(&config, embedding.as_deref()).await?
            };

            let assessment = analyzer.analyze(&resume_text, &job_text)?;
            let report = FitReport::new(assessment, &resume_source, &job_source);

            let generator = ReportGenerator::from_config(&config.output, detailed);
            let rendered = generator.generate_report(&report, output_format)?;
            println!("{}", rendered);

            if let Some(save_path) = save {
                let target = if save_path.is_dir() {
                    save_path.join(suggest_filename(output_format, &resume_source.to_string(), true))
                } else {
                    save_path
                };
                // Console output is saved without color codes
                let content = if output_format == resume_fit::config::OutputFormat::Console {
                    ReportGenerator::with_options(false, config.output.detailed || detailed, true, true)
                        .generate_report(&report, output_format)?
                } else {
                    rendered
                };
                save_report_to_file(&content, &target)?;
                info!("Report saved to {}", target.display());
            }
        }

        Commands::Explain { input, json } => {
            let (_, resume_text, _, job_text) = read_inputs(&input).await?;
            let analyzer = FitAnalyzer::lexical(&config)?;
            let explanation = analyzer.explain(&resume_text, &job_text);

            if json {
                println!("{}", serde_json::to_string_pretty(&explanation)?);
            } else {
                println!("Skill coverage: {:.1}%", explanation.coverage() * 100.0);
                println!("Matched skills: {}", explanation.matched.join(", "));
                println!("Missing skills: {}", explanation.missing.join(", "));
            }
        }

        Commands::Reconcile { label, coverage } => {
            if !(0.0..=1.0).contains(&coverage) {
                return Err(ResumeFitError::InvalidInput(format!(
                    "Coverage must be between 0 and 1, got {}",
                    coverage
                )));
            }
            let reconciler = FitReconciler::new(config.reconciliation.coverage_threshold);
            println!("{}", reconciler.reconcile_display(&label, coverage)?);
        }

        Commands::Skills { file, text } => {
            let source = match (file, text) {
                (Some(path), _) => InputSource::File(path),
                (None, Some(text)) => InputSource::Inline(text),
                (None, None) => {
                    return Err(ResumeFitError::InvalidInput("Provide --file or --text".to_string()));
                }
            };
            let text = InputManager::new().read_resume(&source).await?;
            let extractor = SkillExtractor::new(&config.skills.vocabulary)?;
            let skills = extractor.extract(&text);

            println!("Found {} of {} vocabulary skills", skills.len(), extractor.skill_count());
            for skill in skills.iter() {
                println!("  - {}", skill);
            }
        }

        Commands::Train {
            dataset,
            output,
            embedding,
        } => {
            cli::validate_file_extension(&dataset, &["csv"])
                .map_err(|e| ResumeFitError::InvalidInput(format!("Dataset file: {}", e)))?;

            let records = load_dataset(&dataset)?;
            let engine = EmbeddingEngine::from_config(&config, embedding.as_deref()).await?;
            let trainer = Trainer::new(
                &engine,
                WeakLabeler::from_config(&config.labeling),
                config.training.clone(),
                config.models.batch_size,
            );

            let outcome = trainer.train(&records)?;
            println!("Training pairs: {}", outcome.pair_count);
            println!("{}", outcome.report);

            let output_path = output.unwrap_or_else(|| config.models.classifier_path.clone());
            outcome.classifier.save(&output_path)?;
            println!("Classifier saved to {}", output_path.display());
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.get_models_dir()).await?;

            match action {
                ModelAction::List => {
                    println!("Embedding models\n");
                    for (id, info) in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(id) { "downloaded" } else { "available" };
                        println!("  {} - {} ({}) {} MB [{}]", id, info.name, info.repo_id, info.size_mb, status);
                        println!("    {}", info.description);
                    }

                    let downloaded = manager.list_downloaded_models();
                    if downloaded.is_empty() {
                        println!("\nNo models downloaded yet. Get started with:");
                        println!("  resume-fit models download {}", config.models.default_embedding_model);
                    }
                }

                ModelAction::Download { model, force } => {
                    let model_id = manager
                        .resolve_model_id(&model)
                        .ok_or_else(|| ResumeFitError::ModelNotFound(model.clone()))?;

                    if manager.is_model_downloaded(&model_id) {
                        if !force {
                            println!("Model '{}' is already downloaded. Use --force to re-download.", model_id);
                            return Ok(());
                        }
                        manager.remove_model(&model_id).await?;
                    }

                    let model_path = manager.download_model(&model_id).await?;
                    println!("Model '{}' downloaded to {}", model_id, model_path.display());
                }

                ModelAction::Remove { model } => {
                    let model_id = manager.resolve_model_id(&model).unwrap_or(model);
                    let model_path = manager.remove_model(&model_id).await?;
                    println!("Removed {}", model_path.display());
                }

                ModelAction::Info { model } => {
                    let model_id = manager
                        .resolve_model_id(&model)
                        .ok_or_else(|| ResumeFitError::ModelNotFound(model.clone()))?;
                    let info = manager
                        .get_model_info(&model_id)
                        .ok_or_else(|| ResumeFitError::ModelNotFound(model_id.clone()))?;

                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Size: {} MB", info.size_mb);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Description: {}", info.description);
                    match manager.get_model_path(&model_id) {
                        Some(path) => println!("Status: downloaded ({})", path.display()),
                        None => println!("Status: available (resume-fit models download {})", model_id),
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeFitError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", rendered);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("Configuration reset: {}", config_path.display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

/// Read both texts and reject a blank side
async fn read_inputs(input: &InputArgs) -> Result<(InputSource, String, InputSource, String)> {
    let resume_source = input.resume_source().unwrap_or(InputSource::Inline(String::new()));
    let job_source = input.job_source().unwrap_or(InputSource::Inline(String::new()));

    if let InputSource::File(path) = &resume_source {
        cli::validate_file_extension(path, &["pdf", "txt", "md"])
            .map_err(|e| ResumeFitError::InvalidInput(format!("Resume file: {}", e)))?;
    }

    let mut manager = InputManager::new();
    let resume_text = manager.read_resume(&resume_source).await?;
    let job_text = manager.read_job(&job_source).await?;
    require_both(&resume_text, &job_text)?;

    Ok((resume_source, resume_text, job_source, job_text))
}
