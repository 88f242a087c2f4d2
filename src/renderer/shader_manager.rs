//! Shader Program Manager
//!
//! Turns a [`ShaderSpecs`] into a linked program bound on the context.
//!
//! Sources are minijinja templates. Every stage is rendered with the `ShaderSpecs`
//! values as variables and prefixed with a header holding the same values as
//! `#define`s:
//!
//! ```text
//! #version 330 core
//! #define AMB_LIGHTS 1
//! #define DIR_LIGHTS 0
//! ...
//! <rendered template>
//! ```
//!
//! Template syntax: `{$ ... $}` blocks, `{{ ... }}` expressions and `$$` line
//! statements. `{$ include "name" $}` pulls in a chunk added with
//! [`ShaderManager::add_chunk`].
//!
//! Two caches sit behind [`ShaderManager::set_program`]:
//!
//! | cache    | key                           | value          |
//! |----------|-------------------------------|----------------|
//! | programs | effective `ShaderSpecs`       | linked program |
//! | shaders  | xxh3-128 of the final source  | shader object  |

use log::{debug, warn};
use minijinja::Environment;
use minijinja::syntax::SyntaxConfig;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use xxhash_rust::xxh3::xxh3_128;

use crate::errors::{PrismError, Result};
use crate::gls::consts::{FRAGMENT_SHADER, GEOMETRY_SHADER, VERTEX_SHADER};
use crate::gls::{Gls, ProgramId};
use crate::renderer::specs::ShaderSpecs;

/// Resolves a shader variant and binds it.
pub trait ShaderResolver {
    /// Makes the program for `specs` current, compiling it on first use.
    ///
    /// Returns `Ok(false)` when that program was already current.
    fn set_program(&mut self, gls: &mut Gls, specs: &ShaderSpecs) -> Result<bool>;
}

/// Stage sources of a named program.
#[derive(Debug, Clone)]
struct ProgramSources {
    vertex: String,
    fragment: String,
    /// Extra stages, compiled as geometry shaders
    others: Vec<String>,
}

/// Template registry plus program and shader-object caches.
pub struct ShaderManager {
    env: Environment<'static>,
    shader_names: FxHashSet<String>,
    sources: FxHashMap<String, ProgramSources>,
    programs: FxHashMap<ShaderSpecs, ProgramId>,
    unique_programs: FxHashMap<String, ProgramId>,
    shaders: FxHashMap<u128, u32>,
    current: Option<(ShaderSpecs, ProgramId)>,
}

impl Default for ShaderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderManager {
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();

        let syntax = SyntaxConfig::builder()
            .block_delimiters("{$", "$}")
            .variable_delimiters("{{", "}}")
            .line_statement_prefix("$$")
            .build()
            .expect("Failed to configure shader template syntax");

        env.set_syntax(syntax);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(minijinja::UndefinedBehavior::SemiStrict);
        env.set_path_join_callback(|name, _parent| format!("chunks/{name}").into());

        Self {
            env,
            shader_names: FxHashSet::default(),
            sources: FxHashMap::default(),
            programs: FxHashMap::default(),
            unique_programs: FxHashMap::default(),
            shaders: FxHashMap::default(),
            current: None,
        }
    }

    /// Registers an include chunk, replacing any chunk of the same name.
    pub fn add_chunk(&mut self, name: &str, source: &str) -> Result<()> {
        self.env
            .add_template_owned(format!("chunks/{name}"), source.to_owned())?;
        Ok(())
    }

    /// Registers a stage source, replacing any source of the same name.
    pub fn add_shader(&mut self, name: &str, source: &str) -> Result<()> {
        self.env
            .add_template_owned(name.to_owned(), source.to_owned())?;
        self.shader_names.insert(name.to_owned());
        Ok(())
    }

    /// Declares program `name` from previously added stage sources.
    pub fn add_program(&mut self, name: &str, vertex: &str, fragment: &str, others: &[&str]) {
        self.sources.insert(
            name.to_owned(),
            ProgramSources {
                vertex: vertex.to_owned(),
                fragment: fragment.to_owned(),
                others: others.iter().map(|s| (*s).to_owned()).collect(),
            },
        );
    }

    /// Registers the built-in `lights` chunk and the `basic` program.
    pub fn add_default_shaders(&mut self) -> Result<()> {
        self.add_chunk("lights", include_str!("shaders/chunks/lights.glsl"))?;
        self.add_shader("basic_vertex", include_str!("shaders/basic.vert"))?;
        self.add_shader("basic_fragment", include_str!("shaders/basic.frag"))?;
        self.add_program("basic", "basic_vertex", "basic_fragment", &[]);
        Ok(())
    }

    /// Number of linked programs held in the caches.
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.programs.len() + self.unique_programs.len()
    }

    /// Number of distinct compiled shader objects.
    #[must_use]
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Final source of one stage for `specs`.
    pub fn generate_source(&self, shader: &str, specs: &ShaderSpecs) -> Result<String> {
        if !self.shader_names.contains(shader) {
            return Err(PrismError::UnknownShader(shader.to_owned()));
        }
        let template = self.env.get_template(shader)?;
        let body = template.render(specs.template_values())?;

        let mut source = specs.header();
        source.push_str(&body);
        Ok(source)
    }

    fn lookup(&self, specs: &ShaderSpecs) -> Option<ProgramId> {
        if specs.unique {
            self.unique_programs.get(&specs.name).copied()
        } else {
            self.programs.get(specs).copied()
        }
    }

    fn compile_shader(&mut self, gls: &mut Gls, kind: u32, name: &str, specs: &ShaderSpecs) -> Result<u32> {
        let source = self.generate_source(name, specs)?;
        let hash = xxh3_128(source.as_bytes());
        if let Some(&shader) = self.shaders.get(&hash) {
            return Ok(shader);
        }

        let shader = gls.create_shader(kind)?;
        gls.shader_source(shader, &source);
        gls.compile_shader(shader);
        if !gls.shader_compile_status(shader) {
            let log = gls.shader_info_log(shader);
            gls.delete_shader(shader);
            return Err(PrismError::ShaderCompile {
                name: name.to_owned(),
                log,
            });
        }

        debug!("compiled shader '{name}' ({hash:032x})");
        self.shaders.insert(hash, shader);
        Ok(shader)
    }

    fn build_program(&mut self, gls: &mut Gls, specs: &ShaderSpecs) -> Result<ProgramId> {
        let Some(sources) = self.sources.get(&specs.name).cloned() else {
            return Err(PrismError::UnknownProgram(specs.name.clone()));
        };

        let mut stages: SmallVec<[u32; 3]> = SmallVec::new();
        stages.push(self.compile_shader(gls, VERTEX_SHADER, &sources.vertex, specs)?);
        stages.push(self.compile_shader(gls, FRAGMENT_SHADER, &sources.fragment, specs)?);
        for other in &sources.others {
            stages.push(self.compile_shader(gls, GEOMETRY_SHADER, other, specs)?);
        }

        let program = gls.create_program()?;
        for &shader in &stages {
            gls.attach_shader(program, shader);
        }
        gls.link_program(program);
        if !gls.program_link_status(program) {
            let log = gls.program_info_log(program);
            gls.delete_program(program);
            return Err(PrismError::ProgramLink {
                name: specs.name.clone(),
                log,
            });
        }

        debug!("linked program '{}' as {}", specs.name, program.handle());
        Ok(program)
    }
}

impl ShaderResolver for ShaderManager {
    fn set_program(&mut self, gls: &mut Gls, specs: &ShaderSpecs) -> Result<bool> {
        let specs = specs.effective();

        if let Some((current, program)) = &self.current
            && current.matches(&specs)
            && gls.current_program() == Some(*program)
        {
            return Ok(false);
        }

        let program = if let Some(program) = self.lookup(&specs) {
            program
        } else {
            let program = self.build_program(gls, &specs).inspect_err(|e| {
                warn!("shader program '{}' unavailable: {e}", specs.name);
            })?;
            if specs.unique {
                self.unique_programs.insert(specs.name.clone(), program);
            } else {
                self.programs.insert(specs.clone(), program);
            }
            program
        };

        gls.use_program(program);
        self.current = Some((specs, program));
        Ok(true)
    }
}
