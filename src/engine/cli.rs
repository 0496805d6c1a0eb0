//! Command-line interface for meshview.

use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// OBJ file to view; the built-in cube when absent.
    pub mesh_path: Option<String>,
    /// Diffuse texture; the renderer's white fallback when absent.
    pub texture_path: Option<String>,
}

impl Args {
    /// Parse command-line arguments.
    ///
    /// Usage: `meshview [mesh.obj [texture.png]]`
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        Self::from_slice(&args)
    }

    fn from_slice(args: &[String]) -> Self {
        Self {
            mesh_path: args.first().cloned(),
            texture_path: args.get(1).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_means_builtin_scene() {
        let args = Args::from_slice(&[]);
        assert_eq!(args.mesh_path, None);
        assert_eq!(args.texture_path, None);
    }

    #[test]
    fn positional_mesh_and_texture() {
        let args = Args::from_slice(&strings(&["model.obj"]));
        assert_eq!(args.mesh_path.as_deref(), Some("model.obj"));
        assert_eq!(args.texture_path, None);

        let args = Args::from_slice(&strings(&["model.obj", "diffuse.png"]));
        assert_eq!(args.mesh_path.as_deref(), Some("model.obj"));
        assert_eq!(args.texture_path.as_deref(), Some("diffuse.png"));
    }
}
