//! Quantization job management service.

use std::{sync::Arc, time::Instant};

use mstquant::{gaussian_blur, Color, Image, Quantizer};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tracing::{debug, info, trace};

use crate::common::Error;

#[derive(Deserialize, Clone)]
pub struct QuantizeServiceConfig {
    /// The maximum number of quantization jobs that are allowed to run at a time. Each job
    /// allocates its own color tables, so this bounds memory use as much as CPU use.
    pub max_jobs: usize,
    /// Images with more pixels than this are rejected before quantizing.
    #[serde(default = "default_max_pixels")]
    pub max_pixels: usize,
    /// The color count used when a request doesn't specify one.
    #[serde(default = "default_colors")]
    pub default_colors: usize,
    /// Images with more distinct colors than this are rejected before the spanning tree is
    /// built, since that takes time quadratic in the number of distinct colors.
    #[serde(default = "default_max_distinct_colors")]
    pub max_distinct_colors: usize,
}

fn default_max_pixels() -> usize {
    16 * 1024 * 1024
}

fn default_colors() -> usize {
    16
}

fn default_max_distinct_colors() -> usize {
    65536
}

/// Optional Gaussian pre-pass.
#[derive(Debug, Clone, Copy)]
pub struct Smoothing {
    pub sigma: f64,
    pub mask_size: usize,
}

pub struct QuantizeRequest {
    /// The encoded source image.
    pub image: Vec<u8>,
    /// The number of colors to reduce to; the configured default when absent.
    pub colors: Option<usize>,
    pub smoothing: Option<Smoothing>,
}

#[derive(Debug)]
pub struct QuantizeResponse {
    /// The quantized image, PNG-encoded.
    pub png: Vec<u8>,
    pub distinct_count: usize,
    /// Spanning tree weight, rounded to two decimal places.
    pub mst_weight: f64,
    pub palette: Vec<Color>,
}

type QuantizeResult = Result<QuantizeResponse, Error>;

struct Job {
    request: QuantizeRequest,
    responder: oneshot::Sender<QuantizeResult>,
}

pub struct QuantizeService {
    config: QuantizeServiceConfig,
    jobs: Semaphore,
}

impl QuantizeService {
    pub fn spawn(config: QuantizeServiceConfig) -> QuantizeServiceHandle {
        let (requests_tx, mut requests_rx) = mpsc::channel::<Job>(32);

        let service = Arc::new(QuantizeService {
            jobs: Semaphore::new(config.max_jobs.max(1)),
            config,
        });
        tokio::spawn(async move {
            info!("quantize service is ready");
            while let Some(job) = requests_rx.recv().await {
                trace!("got quantize request");
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    let result = service.run(job.request).await;
                    // Ignore error if the requester is gone.
                    let _ = job.responder.send(result);
                });
            }
        });

        QuantizeServiceHandle {
            requests: requests_tx,
        }
    }

    async fn run(&self, request: QuantizeRequest) -> QuantizeResult {
        // The semaphore is never closed, so acquiring can only fail if the service is gone.
        let _permit = self
            .jobs
            .acquire()
            .await
            .map_err(|_| Error::QuantizeServiceOffline)?;

        let config = self.config.clone();
        tokio::task::spawn_blocking(move || Self::quantize(request, &config))
            .await
            .map_err(|_| Error::QuantizeJobExited)?
    }

    fn quantize(request: QuantizeRequest, config: &QuantizeServiceConfig) -> QuantizeResult {
        let start = Instant::now();
        let colors = request.colors.unwrap_or(config.default_colors);
        debug!(colors, bytes = request.image.len(), "starting quantization job");

        let mut image = Image::decode_limited(&request.image, config.max_pixels).map_err(
            |error| match error {
                mstquant::Error::ImageTooLarge { pixels, limit } => {
                    Error::ImageTooLarge { pixels, limit }
                }
                error => Error::Decode(error),
            },
        )?;
        if let Some(Smoothing { sigma, mask_size }) = request.smoothing {
            image = gaussian_blur(&image, mask_size, sigma).map_err(Error::Quantize)?;
        }

        let result = Quantizer::new(colors)
            .with_max_distinct_colors(config.max_distinct_colors)
            .quantize(&image)
            .map_err(Error::Quantize)?;
        let png = result.image().encode_png().map_err(Error::Encode)?;

        debug!(elapsed = ?start.elapsed(), "quantization job complete");
        Ok(QuantizeResponse {
            png,
            distinct_count: result.distinct_count(),
            mst_weight: result.rounded_mst_weight(),
            palette: result.palette().to_vec(),
        })
    }
}

#[derive(Clone)]
pub struct QuantizeServiceHandle {
    requests: mpsc::Sender<Job>,
}

impl QuantizeServiceHandle {
    pub async fn quantize(&self, request: QuantizeRequest) -> QuantizeResult {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(Job {
                request,
                responder: tx,
            })
            .await
            .map_err(|_| Error::QuantizeServiceOffline)?;
        match rx.await {
            Ok(r) => r,
            Err(_) => Err(Error::QuantizeJobExited),
        }
    }
}
