use std::rc::Rc;

use glam::{Affine3A, Mat3, Mat4};
use smallvec::SmallVec;

use crate::gls::Gls;
use crate::renderer::RenderInfo;
use crate::resources::{Geometry, Material, ShaderDefines};

/// A material applied to a range of the graphic's geometry.
#[derive(Debug, Clone)]
pub struct GraphicMaterial {
    pub material: Rc<Material>,
    /// First element of the range
    pub start: u32,
    /// Element count; 0 draws to the end of the geometry
    pub count: u32,
}

/// A drawable: geometry plus one or more materials.
#[derive(Debug, Clone)]
pub struct Graphic {
    pub geometry: Rc<Geometry>,
    pub materials: SmallVec<[GraphicMaterial; 2]>,
    pub renderable: bool,
    pub cullable: bool,
    /// Lower values draw first within their bucket, before depth ordering
    pub render_order: i32,
    pub defines: ShaderDefines,

    model_view: Mat4,
    mvp: Mat4,
    normal: Mat3,
}

impl Graphic {
    /// A graphic drawing all of `geometry` with `material`.
    #[must_use]
    pub fn new(geometry: Rc<Geometry>, material: Rc<Material>) -> Self {
        let mut graphic = Self::empty(geometry);
        graphic.add_material(material);
        graphic
    }

    /// A graphic with no materials yet.
    #[must_use]
    pub fn empty(geometry: Rc<Geometry>) -> Self {
        Self {
            geometry,
            materials: SmallVec::new(),
            renderable: true,
            cullable: true,
            render_order: 0,
            defines: ShaderDefines::new(),
            model_view: Mat4::IDENTITY,
            mvp: Mat4::IDENTITY,
            normal: Mat3::IDENTITY,
        }
    }

    pub fn add_material(&mut self, material: Rc<Material>) {
        self.add_group_material(material, 0, 0);
    }

    /// Adds a material for `count` elements starting at `start`.
    pub fn add_group_material(&mut self, material: Rc<Material>, start: u32, count: u32) {
        self.materials.push(GraphicMaterial {
            material,
            start,
            count,
        });
    }

    #[must_use]
    pub fn with_render_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }

    #[must_use]
    pub fn with_cullable(mut self, cullable: bool) -> Self {
        self.cullable = cullable;
        self
    }

    /// Caches model-view, model-view-projection and normal matrices for this
    /// frame.
    pub fn calculate_matrices(&mut self, world: &Affine3A, rinfo: &RenderInfo) {
        self.model_view = rinfo.view_matrix * Mat4::from(*world);
        self.mvp = rinfo.projection_matrix * self.model_view;
        self.normal = Mat3::from_mat4(self.model_view).inverse().transpose();
    }

    #[inline]
    #[must_use]
    pub fn model_view_matrix(&self) -> &Mat4 {
        &self.model_view
    }

    #[inline]
    #[must_use]
    pub fn mvp_matrix(&self) -> &Mat4 {
        &self.mvp
    }

    #[inline]
    #[must_use]
    pub fn normal_matrix(&self) -> &Mat3 {
        &self.normal
    }

    /// View-space Z of the world origin of this graphic.
    #[inline]
    #[must_use]
    pub fn view_z(&self) -> f32 {
        self.model_view.w_axis.z
    }

    /// Applies material `index` and draws its range. Out-of-range indices
    /// are ignored.
    pub fn render(&self, gls: &mut Gls, index: usize) {
        let Some(grmat) = self.materials.get(index) else {
            return;
        };
        grmat.material.render_setup(gls);

        if let Some(loc) = gls.uniform_location("ModelViewMatrix") {
            gls.uniform_matrix4fv(loc, false, &self.model_view.to_cols_array());
        }
        if let Some(loc) = gls.uniform_location("MVP") {
            gls.uniform_matrix4fv(loc, false, &self.mvp.to_cols_array());
        }
        if let Some(loc) = gls.uniform_location("NormalMatrix") {
            gls.uniform_matrix3fv(loc, false, &self.normal.to_cols_array());
        }

        self.geometry.draw(gls, grmat.start, grmat.count);
    }
}
