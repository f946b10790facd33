use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kiln_assets::assets::AssetLoader;
use kiln_assets::compile::shader::{
    ColorInputType, RenderingType, ShaderSpecification, TextureInputType,
};
use kiln_assets::documents::{EntityClass, GameState, InputMode, Scene, UiObject};
use kiln_assets::{AssetStore, AssetType, Project};
use log::{error, info};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Asset pipeline for Kiln projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project with empty registries
    Init { directory: PathBuf, name: String },
    /// Import media files, or every importable file under a directory
    Import {
        project: PathBuf,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List registered assets
    List {
        project: PathBuf,
        /// Only list one asset type
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Compile a shader from specification flags
    Shader {
        project: PathBuf,
        #[arg(long, value_enum, default_value_t = ColorArg::None)]
        color: ColorArg,
        #[arg(long, value_enum, default_value_t = TextureArg::None)]
        texture: TextureArg,
        #[arg(long)]
        circle: bool,
        #[arg(long)]
        projection: bool,
        #[arg(long)]
        entity_id: bool,
        #[arg(long)]
        outline: bool,
        #[arg(long, value_enum, default_value_t = PrimitiveArg::Index)]
        primitive: PrimitiveArg,
    },
    /// Create a new document
    New {
        project: PathBuf,
        kind: DocumentArg,
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Texture,
    Audio,
    Font,
    Shader,
    Scene,
    Ui,
    Input,
    State,
    Class,
}

impl KindArg {
    fn asset_type(self) -> AssetType {
        match self {
            KindArg::Texture => AssetType::Texture,
            KindArg::Audio => AssetType::Audio,
            KindArg::Font => AssetType::Font,
            KindArg::Shader => AssetType::Shader,
            KindArg::Scene => AssetType::Scene,
            KindArg::Ui => AssetType::UiObject,
            KindArg::Input => AssetType::InputMode,
            KindArg::State => AssetType::GameState,
            KindArg::Class => AssetType::EntityClass,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DocumentArg {
    Scene,
    Ui,
    Input,
    State,
    Class,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    None,
    Flat,
    Vertex,
}

#[derive(Clone, Copy, ValueEnum)]
enum TextureArg {
    None,
    Color,
    Text,
}

#[derive(Clone, Copy, ValueEnum)]
enum PrimitiveArg {
    Index,
    Triangle,
    Line,
    Point,
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { directory, name } => init(&directory, &name),
        Commands::Import { project, paths } => import(&project, &paths),
        Commands::List { project, kind } => list(&project, kind),
        Commands::Shader {
            project,
            color,
            texture,
            circle,
            projection,
            entity_id,
            outline,
            primitive,
        } => {
            let specification = ShaderSpecification {
                color_input: match color {
                    ColorArg::None => ColorInputType::None,
                    ColorArg::Flat => ColorInputType::FlatColor,
                    ColorArg::Vertex => ColorInputType::VertexColor,
                },
                texture_input: match texture {
                    TextureArg::None => TextureInputType::None,
                    TextureArg::Color => TextureInputType::ColorTexture,
                    TextureArg::Text => TextureInputType::TextTexture,
                },
                add_circle_shape: circle,
                add_projection_matrix: projection,
                add_entity_id: entity_id,
                draw_outline: outline,
                rendering_type: match primitive {
                    PrimitiveArg::Index => RenderingType::DrawIndex,
                    PrimitiveArg::Triangle => RenderingType::DrawTriangle,
                    PrimitiveArg::Line => RenderingType::DrawLine,
                    PrimitiveArg::Point => RenderingType::DrawPoint,
                },
            };
            shader(&project, &specification)
        }
        Commands::New {
            project,
            kind,
            name,
        } => new_document(&project, kind, &name),
    }
}

/// Load a project and open a store on it
fn open(project_file: &Path) -> Result<AssetStore> {
    let path = std::fs::canonicalize(project_file)
        .with_context(|| format!("Project file {} not found", project_file.display()))?;
    let project = Project::load(&path)?;

    let mut store = AssetStore::new();
    store
        .open(&project)
        .with_context(|| format!("Failed to open assets for '{}'", project.name))?;
    Ok(store)
}

fn init(directory: &Path, name: &str) -> Result<()> {
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;
    let directory = std::fs::canonicalize(directory)?;

    let project = Project::new(&directory, name);
    project.save()?;

    let mut store = AssetStore::new();
    store.open(&project)?;
    store.serialize_all()?;

    info!("Created project '{}' at {}", name, project.project_file().display());
    Ok(())
}

fn import(project_file: &Path, paths: &[PathBuf]) -> Result<()> {
    let mut store = open(project_file)?;

    let mut sources = Vec::new();
    for path in paths {
        let path = std::fs::canonicalize(path)
            .with_context(|| format!("{} not found", path.display()))?;
        if path.is_dir() {
            sources.extend(AssetLoader::scan_sources(&path)?);
        } else if let Some(asset_type) = AssetType::from_source_path(&path) {
            sources.push((asset_type, path));
        } else {
            error!("Skipping {}: unsupported file type", path.display());
        }
    }

    let mut failed = 0;
    for (asset_type, path) in &sources {
        let result = match asset_type {
            AssetType::Texture => store.import_texture(path),
            AssetType::Audio => store.import_audio(path),
            AssetType::Font => store.import_font(path),
            _ => continue,
        };
        match result {
            Ok(handle) => info!("{} {} -> {}", asset_type, path.display(), handle),
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(_) => failed += 1,
        }
    }

    info!("Processed {} source file(s), {} failed", sources.len(), failed);
    if failed > 0 {
        bail!("{} import(s) failed", failed);
    }
    Ok(())
}

fn list(project_file: &Path, kind: Option<KindArg>) -> Result<()> {
    let store = open(project_file)?;

    let types: Vec<AssetType> = match kind {
        Some(kind) => vec![kind.asset_type()],
        None => AssetType::ALL.to_vec(),
    };

    for asset_type in types {
        let assets = store.assets(asset_type);
        println!("{} ({})", asset_type, assets.len());
        for asset in assets {
            match asset.source_path() {
                Some(source) => println!(
                    "  {:>20}  {}  <- {}",
                    asset.handle,
                    asset.intermediate_location.display(),
                    source.display()
                ),
                None => println!(
                    "  {:>20}  {}",
                    asset.handle,
                    asset.intermediate_location.display()
                ),
            }
        }
    }
    Ok(())
}

fn shader(project_file: &Path, specification: &ShaderSpecification) -> Result<()> {
    let mut store = open(project_file)?;
    let (handle, shader) = store.get_shader_by_spec(specification)?;

    println!("{}", handle);
    info!(
        "Shader {} takes a {}-byte vertex stride and a {}-byte uniform buffer",
        handle,
        shader.input_layout().stride,
        shader.uniform_list().size
    );
    Ok(())
}

fn new_document(project_file: &Path, kind: DocumentArg, name: &str) -> Result<()> {
    let mut store = open(project_file)?;

    let handle = match kind {
        DocumentArg::Scene => store.create_document::<Scene>(name)?,
        DocumentArg::Ui => store.create_document::<UiObject>(name)?,
        DocumentArg::Input => store.create_document::<InputMode>(name)?,
        DocumentArg::State => store.create_document::<GameState>(name)?,
        DocumentArg::Class => store.create_document::<EntityClass>(name)?,
    };

    println!("{}", handle);
    Ok(())
}
