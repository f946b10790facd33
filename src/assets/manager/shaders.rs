// Shader creation from specifications and lookup by handle or specification

use super::{lookup, reported, AssetStore};
use crate::assets::{Asset, AssetError, AssetHandle, AssetType, ShaderMetadata, TypeMetadata};
use crate::compile::shader::{self, CompiledShader, ShaderSpecification, ShaderStage};
use crate::core::checksum::checksum_str;
use crate::runtime::Shader;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

const STAGES: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

impl AssetStore {
    /// Generate and compile a shader for `specification`
    ///
    /// Deduplicated on the generated source, so equal specifications share one handle.
    pub fn create_shader(&mut self, specification: &ShaderSpecification) -> Result<AssetHandle, AssetError> {
        let result = self.create_shader_inner(specification);
        reported("Shader creation", result)
    }

    pub fn get_shader(&mut self, handle: AssetHandle) -> Option<Arc<Shader>> {
        if let Some(shader) = self.shaders.get(handle) {
            return Some(shader);
        }
        let result = self.instantiate_shader(handle);
        lookup(AssetType::Shader, handle, result)
    }

    /// Shader matching `specification` field for field, compiling it if none exists
    pub fn get_shader_by_spec(
        &mut self,
        specification: &ShaderSpecification,
    ) -> Result<(AssetHandle, Arc<Shader>), AssetError> {
        if let Some(found) = self
            .shaders
            .find(|shader| shader.specification() == specification)
        {
            return Ok(found);
        }

        let registered = self
            .registry(AssetType::Shader)
            .iter()
            .find(|asset| {
                matches!(&asset.metadata, TypeMetadata::Shader(meta) if meta.specification == *specification)
            })
            .map(|asset| asset.handle);

        let handle = match registered {
            Some(handle) => handle,
            None => self.create_shader(specification)?,
        };
        let shader = self.get_shader(handle).ok_or(AssetError::UnknownHandle {
            asset_type: AssetType::Shader,
            handle,
        })?;
        Ok((handle, shader))
    }

    fn create_shader_inner(&mut self, specification: &ShaderSpecification) -> Result<AssetHandle, AssetError> {
        self.loader()?;
        let generated = shader::generate(specification);

        let checksum = checksum_str(&generated.source);
        if let Some(handle) = self.find_duplicate(AssetType::Shader, &checksum) {
            return Ok(handle);
        }

        let compiled = shader::compile(&generated.source)?;
        let handle = AssetHandle::generate();
        let location = AssetType::Shader.intermediate_location(handle);

        let loader = self.loader()?;
        for stage in STAGES {
            let words = compiled.stage(stage);
            loader.write_bytes(
                location.with_extension(stage.extension()),
                bytemuck::cast_slice(words),
            )?;
        }
        if self.config()?.write_shader_sources {
            loader.write_bytes(location.with_extension("source"), generated.source.as_bytes())?;
            debug!("Wrote shader source for {}", handle);
        }

        let metadata = ShaderMetadata {
            specification: *specification,
            input_layout: generated.input_layout,
            uniform_list: generated.uniform_list,
        };
        let runtime = Shader::new(&metadata, compiled);

        self.register(Asset {
            handle,
            checksum,
            intermediate_location: location,
            metadata: TypeMetadata::Shader(metadata),
        })?;
        info!("Compiled shader {} for {:?}", handle, specification);

        self.shaders.insert(handle, runtime);
        Ok(handle)
    }

    fn instantiate_shader(&mut self, handle: AssetHandle) -> Result<Arc<Shader>, AssetError> {
        let asset = self.registered(AssetType::Shader, handle)?;
        let metadata = asset.metadata.as_shader()?;

        let loader = self.loader()?;
        let vertex = load_words(loader.resolve(
            asset.intermediate_location.with_extension(ShaderStage::Vertex.extension()),
        ))?;
        let fragment = load_words(loader.resolve(
            asset.intermediate_location.with_extension(ShaderStage::Fragment.extension()),
        ))?;

        let shader = Shader::new(metadata, CompiledShader { vertex, fragment });
        Ok(self.shaders.insert(handle, shader))
    }
}

/// Read a SPIR-V binary as 32-bit words
fn load_words(path: impl AsRef<Path>) -> Result<Vec<u32>, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(AssetError::decode(path, "SPIR-V length is not a multiple of 4"));
    }
    Ok(bytemuck::pod_collect_to_vec(&bytes))
}
