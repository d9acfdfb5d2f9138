use cfselect::param;
use cfselect::run;
use chrono::Local;
use flexi_logger::{FileSpec, Logger};
use log::error;
use std::env;
use std::process::exit;

fn main() {
    let args: Vec<String> = env::args().collect();
    let param_path = if args.len() > 1 { args[1].clone() } else { "param.yaml".to_string() };

    let param = match param::get(param_path.clone()) {
        Ok(param) => param,
        Err(err) => {
            eprintln!("Cannot load parameter file {}: {}", param_path, err);
            exit(1);
        }
    };

    // Log to a timestamped file when log_base is set, to stderr otherwise
    let _logger = if param.general.log_base.len() > 0 {
        Logger::try_with_str(&param.general.log_level)
            .expect("Invalid log level")
            .log_to_file(
                FileSpec::default()
                    .basename(param.general.log_base.as_str())
                    .suffix(param.general.log_suffix.as_str())
                    .discriminant(Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()),
            )
            .start()
            .expect("Cannot start logger")
    } else {
        Logger::try_with_env_or_str(&param.general.log_level)
            .expect("Invalid log level")
            .start()
            .expect("Cannot start logger")
    };

    match run(&param) {
        Ok(selection) => {
            if selection.features.is_empty() {
                println!("No feature improved the merit score: nothing selected.");
                return;
            }
            if param.general.display_colorful {
                println!("\x1b[1;93mSelected features (k={})\x1b[0m", selection.features.len());
            } else {
                println!("Selected features (k={})", selection.features.len());
            }
            for (rank, name) in selection.feature_names.iter().enumerate() {
                if param.general.display_colorful {
                    println!(
                        "\x1b[1;93m#{}\x1b[0m: {} || subset merit {:.6}",
                        rank + 1,
                        name,
                        selection.merit_history[rank]
                    );
                } else {
                    println!("#{}: {} || subset merit {:.6}", rank + 1, name, selection.merit_history[rank]);
                }
            }
        }
        Err(err) => {
            error!("Search failed: {}", err);
            exit(1);
        }
    }
}
