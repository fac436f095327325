pub mod artifacts;

pub use artifacts::{
    artifact_for_date, latest_artifact, load_analysis, write_artifacts, ArtifactPaths,
};
