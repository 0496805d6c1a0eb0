mod engine;

use log::{error, info};

use engine::camera::Camera;
use engine::cli::Args;
use engine::graphics::{obj, texture, MeshFactory, Renderer};
use engine::math::Vector3;
use engine::scene::Scene;
use engine::windowing::Windowing;
use engine::EngineResult;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> EngineResult<()> {
    let args = Args::parse();

    let mesh = match &args.mesh_path {
        Some(path) => obj::load_obj(path)?,
        None => {
            info!("no mesh given, showing the built-in cube");
            MeshFactory::cube()
        }
    };

    let diffuse = match &args.texture_path {
        Some(path) => Some(texture::load_rgba8(path)?),
        None => None,
    };

    let mut camera = Camera::new();
    camera.transform.set_position(Vector3::new(2.5, 2.3, 3.5));
    camera.transform.look_at(Vector3::new(0.0, 0.8, 0.0), Vector3::unit_y());

    let scene = Scene::new(camera);
    let renderer = Renderer::new();

    Windowing::run_app(scene, renderer, mesh, diffuse)
}
