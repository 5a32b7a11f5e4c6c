use super::generate_content::GenerateContent;
use super::generate_image::GenerateImage;
use crate::domain::{RoastStatus, RoastSubject};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Background work for one roast. Each record gets exactly one
/// `GenerateContent`, and at most one `GenerateImage` which is only ever
/// produced by a successful `GenerateContent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoastJob {
    GenerateContent(RoastSubject),
    GenerateImage(RoastSubject),
}

impl RoastJob {
    pub fn roast_id(&self) -> Uuid {
        match self {
            Self::GenerateContent(subject) | Self::GenerateImage(subject) => subject.roast_id,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("work queue is closed, dropped job for roast {}", .0.roast_id())]
pub struct QueueClosed(pub RoastJob);

pub type JobReceiver = mpsc::UnboundedReceiver<RoastJob>;

/// Producer side of the job queue.
#[derive(Clone)]
pub struct WorkQueue {
    sender: mpsc::UnboundedSender<RoastJob>,
}

impl WorkQueue {
    pub fn new() -> (Self, JobReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn enqueue(&self, job: RoastJob) -> Result<(), QueueClosed> {
        self.sender.send(job).map_err(|e| QueueClosed(e.0))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Executes a single job and returns its follow-up, if any.
pub struct RoastJobRunner {
    content: GenerateContent,
    image: GenerateImage,
}

impl RoastJobRunner {
    pub fn new(content: GenerateContent, image: GenerateImage) -> Self {
        Self { content, image }
    }

    pub async fn run(&self, job: RoastJob) -> Option<RoastJob> {
        match job {
            RoastJob::GenerateContent(subject) => match self.content.execute(&subject).await {
                Ok(RoastStatus::ContentReady) if self.image.is_enabled() => {
                    Some(RoastJob::GenerateImage(subject))
                }
                Ok(_) => None,
                Err(e) => {
                    tracing::error!("Content job for roast {} failed: {}", subject.roast_id, e);
                    None
                }
            },
            RoastJob::GenerateImage(subject) => {
                self.image.execute(&subject).await;
                None
            }
        }
    }
}

/// Fixed set of tokio tasks consuming the shared job queue.
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
}

impl WorkerPool {
    /// # Panics
    /// Panics if `worker_count` is 0.
    pub fn spawn(
        runner: Arc<RoastJobRunner>,
        queue: WorkQueue,
        receiver: JobReceiver,
        worker_count: usize,
    ) -> Self {
        assert!(worker_count > 0, "worker_count must be > 0");
        let receiver = Arc::new(Mutex::new(receiver));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let workers = (0..worker_count)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    Arc::clone(&runner),
                    queue.clone(),
                    Arc::clone(&receiver),
                    shutdown_rx.clone(),
                ))
            })
            .collect();

        tracing::info!("Started {} roast workers", worker_count);

        Self { workers, shutdown }
    }

    /// Stops accepting new jobs, finishes everything already queued
    /// (including follow-ups) and waits for the workers to exit.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down roast workers...");
        let _ = self.shutdown.send(true);

        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.await {
                tracing::error!("Worker {} panicked: {:?}", i, e);
            }
        }

        tracing::info!("All roast workers have stopped");
    }
}

async fn run_worker(
    worker_id: usize,
    runner: Arc<RoastJobRunner>,
    queue: WorkQueue,
    receiver: Arc<Mutex<JobReceiver>>,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::debug!("Worker {} started", worker_id);

    loop {
        let job = {
            let mut rx = receiver.lock().await;
            if *shutdown.borrow_and_update() {
                rx.close();
                rx.recv().await
            } else {
                tokio::select! {
                    job = rx.recv() => job,
                    _ = shutdown.changed() => {
                        rx.close();
                        rx.recv().await
                    }
                }
            }
        };

        let Some(job) = job else {
            break;
        };

        tracing::debug!("Worker {} processing {:?}", worker_id, job);
        let mut next = runner.run(job).await;
        while let Some(follow_up) = next.take() {
            // Once the queue is closed, follow-ups run on this worker so
            // shutdown never strands a roast between content and image.
            if let Err(QueueClosed(job)) = queue.enqueue(follow_up) {
                next = runner.run(job).await;
            }
        }
    }

    tracing::debug!("Worker {} finished", worker_id);
}
