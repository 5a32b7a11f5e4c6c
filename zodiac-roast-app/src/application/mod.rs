mod create_roast;
mod generate_content;
mod generate_image;
mod jobs;
mod ports;
mod roast_queries;

pub use create_roast::CreateRoast;
pub use generate_content::{GenerateContent, RetryPolicy};
pub use generate_image::GenerateImage;
pub use jobs::{JobReceiver, QueueClosed, RoastJob, RoastJobRunner, WorkQueue, WorkerPool};
pub use ports::{BlobStore, ImageProvider, TextGenerator};
pub use roast_queries::{RoastQueries, LEADERBOARD_LIMIT};
