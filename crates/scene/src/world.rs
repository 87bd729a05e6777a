use crate::components::{Drawable3D, Transform, Visibility};
use crate::entity::EntityId;
use foundation::handles::Handle;

/// Flat entity store with an optional parent link per entity.
///
/// Groups are plain entities without a drawable. Transforms and visibility
/// are inherited along parent links, so moving a group moves everything
/// attached to it.
#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    names: Vec<Option<String>>,
    parents: Vec<Option<EntityId>>,
    transforms: Vec<Option<Transform>>,
    visibility: Vec<Option<Visibility>>,
    drawables_3d: Vec<Option<Drawable3D>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(Handle::new(self.next_index));
        self.next_index += 1;
        self.ensure_capacity(id.index() as usize);
        id
    }

    /// Spawns an empty, named group under `parent`.
    pub fn spawn_group(&mut self, name: &str, parent: Option<EntityId>) -> EntityId {
        let entity = self.spawn();
        self.set_name(entity, name);
        self.set_transform(entity, Transform::identity());
        if let Some(parent) = parent {
            self.set_parent(entity, parent);
        }
        entity
    }

    pub fn len(&self) -> usize {
        self.next_index as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        self.ensure_capacity(entity.index() as usize);
        self.names[entity.index() as usize] = Some(name.into());
    }

    pub fn name(&self, entity: EntityId) -> Option<&str> {
        self.names
            .get(entity.index() as usize)
            .and_then(|n| n.as_deref())
    }

    pub fn set_parent(&mut self, entity: EntityId, parent: EntityId) {
        self.ensure_capacity(entity.index() as usize);
        self.parents[entity.index() as usize] = Some(parent);
    }

    pub fn parent(&self, entity: EntityId) -> Option<EntityId> {
        self.parents.get(entity.index() as usize).and_then(|p| *p)
    }

    /// Direct children of `parent`, in spawn order.
    pub fn children(&self, parent: EntityId) -> Vec<EntityId> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == Some(parent))
            .map(|(idx, _)| EntityId(Handle::new(idx as u32)))
            .collect()
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        self.ensure_capacity(entity.index() as usize);
        self.transforms[entity.index() as usize] = Some(transform);
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.transforms.get(entity.index() as usize).and_then(|t| *t)
    }

    pub fn transform_mut(&mut self, entity: EntityId) -> Option<&mut Transform> {
        self.transforms
            .get_mut(entity.index() as usize)
            .and_then(|t| t.as_mut())
    }

    pub fn set_visibility(&mut self, entity: EntityId, visibility: Visibility) {
        self.ensure_capacity(entity.index() as usize);
        self.visibility[entity.index() as usize] = Some(visibility);
    }

    /// Own visibility flag; entities without one are visible.
    pub fn is_visible(&self, entity: EntityId) -> bool {
        self.visibility
            .get(entity.index() as usize)
            .and_then(|v| *v)
            .map(|v| v.visible)
            .unwrap_or(true)
    }

    /// Visible only if the entity and every ancestor are visible.
    pub fn is_visible_in_hierarchy(&self, entity: EntityId) -> bool {
        let mut current = Some(entity);
        let mut depth = 0;
        while let Some(e) = current {
            if !self.is_visible(e) {
                return false;
            }
            current = self.parent(e);
            depth += 1;
            if depth > self.len() {
                // Parent cycle.
                return false;
            }
        }
        true
    }

    pub fn set_drawable_3d(&mut self, entity: EntityId, drawable: Drawable3D) {
        self.ensure_capacity(entity.index() as usize);
        self.drawables_3d[entity.index() as usize] = Some(drawable);
    }

    pub fn drawable_3d(&self, entity: EntityId) -> Option<&Drawable3D> {
        self.drawables_3d
            .get(entity.index() as usize)
            .and_then(|d| d.as_ref())
    }

    pub fn drawable_3d_mut(&mut self, entity: EntityId) -> Option<&mut Drawable3D> {
        self.drawables_3d
            .get_mut(entity.index() as usize)
            .and_then(|d| d.as_mut())
    }

    /// Transform of `entity` composed with all of its ancestors.
    ///
    /// Entities without a transform contribute the identity.
    pub fn world_transform(&self, entity: EntityId) -> Transform {
        let mut chain = Vec::new();
        let mut current = Some(entity);
        while let Some(e) = current {
            if chain.len() > self.len() {
                break;
            }
            chain.push(e);
            current = self.parent(e);
        }

        let mut world = Transform::identity();
        for e in chain.into_iter().rev() {
            let local = self.transform(e).unwrap_or_default();
            world = world.compose(&local);
        }
        world
    }

    /// Visible drawables with world-space transforms, in entity order.
    pub fn drawables_3d(&self) -> Vec<(EntityId, Transform, Drawable3D)> {
        let mut out = Vec::new();
        for (idx, drawable) in self.drawables_3d.iter().enumerate() {
            let Some(drawable) = drawable else { continue };
            let entity = EntityId(Handle::new(idx as u32));
            if !self.is_visible_in_hierarchy(entity) {
                continue;
            }
            out.push((entity, self.world_transform(entity), drawable.clone()));
        }
        out
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.transforms.len() <= idx {
            let new_len = idx + 1;
            self.names.resize(new_len, None);
            self.parents.resize(new_len, None);
            self.transforms.resize(new_len, None);
            self.visibility.resize(new_len, None);
            self.drawables_3d.resize(new_len, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::World;
    use crate::components::{Drawable3D, Material, Transform, Visibility};
    use foundation::math::Vec3;

    #[test]
    fn spawn_and_collect_drawables() {
        let mut world = World::new();
        let entity = world.spawn();
        world.set_transform(entity, Transform::identity());
        world.set_drawable_3d(entity, Drawable3D::sphere(1.0, 8, Material::Atmosphere));

        let drawables = world.drawables_3d();
        assert_eq!(drawables.len(), 1);
        assert_eq!(drawables[0].0, entity);
    }

    #[test]
    fn hidden_parent_hides_children() {
        let mut world = World::new();
        let root = world.spawn_group("root", None);
        let child = world.spawn();
        world.set_parent(child, root);
        world.set_drawable_3d(child, Drawable3D::sphere(1.0, 8, Material::Atmosphere));

        assert_eq!(world.drawables_3d().len(), 1);
        world.set_visibility(root, Visibility::hidden());
        assert!(world.drawables_3d().is_empty());
        assert!(world.is_visible(child));
        assert!(!world.is_visible_in_hierarchy(child));
    }

    #[test]
    fn group_yaw_moves_children() {
        let mut world = World::new();
        let group = world.spawn_group("pivot", None);
        let child = world.spawn();
        world.set_parent(child, group);
        world.set_transform(child, Transform::translate(Vec3::new(1.0, 0.0, 0.0)));

        if let Some(t) = world.transform_mut(group) {
            t.yaw_rad = std::f64::consts::PI;
        }
        let p = world.world_transform(child).position;
        assert!((p - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn children_are_listed_in_spawn_order() {
        let mut world = World::new();
        let group = world.spawn_group("points", None);
        let a = world.spawn();
        let b = world.spawn();
        world.set_parent(b, group);
        world.set_parent(a, group);
        assert_eq!(world.children(group), vec![a, b]);
        assert_eq!(world.name(group), Some("points"));
    }
}
