//! Backend commands queued from UI to backend worker.

use shared::domain::SymbolSet;

pub enum BackendCommand {
    Predict { symbols: SymbolSet },
    FetchArtifactPreview { filename: String },
    DownloadArtifact { filename: String },
}
