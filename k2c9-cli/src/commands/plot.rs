//! Plot command - render the footprint map to an image file.

use std::path::Path;

use k2c9::QueryService;
use tracing::info;

use crate::error::CliError;

/// Run the plot command.
pub fn run(
    service: &QueryService,
    pos: Option<&str>,
    size: Option<f64>,
    output: &Path,
) -> Result<(), CliError> {
    let bytes = service.render(pos, size)?;

    std::fs::write(output, &bytes).map_err(|source| CliError::Output {
        path: output.to_path_buf(),
        source,
    })?;

    let config = service.renderer().config();
    info!(path = %output.display(), bytes = bytes.len(), "Wrote footprint plot");
    println!(
        "Wrote {}x{} {} to {}",
        config.width,
        config.height,
        config.encoding,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use k2c9::render::RenderConfig;
    use tempfile::TempDir;

    fn service() -> QueryService {
        QueryService::with_builtin(RenderConfig::default().with_size(200, 150)).unwrap()
    }

    #[test]
    fn test_plot_writes_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("k2c9.png");

        run(&service(), Some("270.0 -28.0"), Some(2.0), &output).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_plot_invalid_query_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("k2c9.png");

        let result = run(&service(), Some("not a position"), None, &output);
        assert!(matches!(result, Err(CliError::Query(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_plot_unwritable_output() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("missing-dir").join("k2c9.png");

        let result = run(&service(), None, None, &output);
        assert!(matches!(result, Err(CliError::Output { .. })));
    }
}
