mod download;
mod local_blob_store;

pub use download::download_image;
pub use local_blob_store::{LocalBlobStore, IMAGE_ROUTE};
