#![allow(non_snake_case)]

pub mod data;
pub mod forward;
pub mod merit;
pub mod param;
pub mod utils;

use data::Data;
use log::{debug, info, warn};
use param::Param;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Outcome of a forward search: the accepted feature indices in acceptance
/// order, their names, and the merit score recorded when each was accepted.
/// An empty selection means no feature improved on the initial floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub merit_history: Vec<f64>,
    pub features: Vec<usize>,
    pub feature_names: Vec<String>,
    pub execution_time: f64,
}

/// Load the dataset named by the parameters and run the forward search on it.
pub fn run(param: &Param) -> Result<Selection, Box<dyn Error>> {
    let mut data = Data::new();
    data.load_data(&param.data.X, &param.data.y, param.data.features_in_rows)?;
    data.set_classes(param.data.classes.clone());
    debug!("{:?}", data);

    run_on_data(&data, param)
}

/// Run the forward search on an already loaded dataset, with candidate
/// scoring spread over a thread pool sized by the parameters.
pub fn run_on_data(data: &Data, param: &Param) -> Result<Selection, Box<dyn Error>> {
    let start = std::time::Instant::now();

    let pool = ThreadPoolBuilder::new()
        .num_threads(param.general.thread_number)
        .build()?;

    info!(
        "Launching CFS forward search on {} features x {} samples ({} threads)",
        data.feature_len, data.sample_len, param.general.thread_number
    );

    let (merit_history, features) = pool.install(|| forward::forward_search(data, param))?;

    if features.is_empty() {
        warn!("No feature improved the merit score: empty selection.");
    }
    for (rank, &j) in features.iter().enumerate() {
        let (r, p_value) = data.feature_association(j);
        info!(
            "#{} {} : |r|={:.3} (p={:.2e}) subset merit {:.6}",
            rank + 1,
            data.features[j],
            r.abs(),
            p_value,
            merit_history[rank]
        );
    }

    let execution_time = start.elapsed().as_secs_f64();
    info!("Search completed in {:.3}s ({} features selected)", execution_time, features.len());

    Ok(Selection {
        merit_history,
        feature_names: features.iter().map(|&j| data.features[j].clone()).collect(),
        features,
        execution_time,
    })
}
