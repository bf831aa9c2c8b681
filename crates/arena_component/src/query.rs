//! Query descriptors for system data access declarations.
//!
//! A [`QueryDescriptor`] declares which component types an entity must hold
//! (and which it must not) to be matched. The world resolves descriptors
//! against the [`ComponentIndex`](crate::ComponentIndex).

use crate::component::{Component, ComponentTypeId};

/// Describes the component signature a system iterates over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Component types every matched entity must hold.
    pub required: Vec<ComponentTypeId>,
    /// Filters applied on top of the required set.
    pub filters: Vec<QueryFilter>,
}

impl QueryDescriptor {
    /// Create a new empty query descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require component type `T`.
    #[must_use]
    pub fn with<T: Component>(self) -> Self {
        self.require(ComponentTypeId::of::<T>())
    }

    /// Exclude entities holding component type `T`.
    #[must_use]
    pub fn without<T: Component>(self) -> Self {
        self.filter(QueryFilter::Without(ComponentTypeId::of::<T>()))
    }

    /// Require a component type by id.
    #[must_use]
    pub fn require(mut self, type_id: ComponentTypeId) -> Self {
        if !self.required.contains(&type_id) {
            self.required.push(type_id);
        }
        self
    }

    /// Add a query filter.
    #[must_use]
    pub fn filter(mut self, f: QueryFilter) -> Self {
        self.filters.push(f);
        self
    }

    /// Returns every component type a matched entity must hold: the required
    /// list plus any `With` filters.
    #[must_use]
    pub fn required_types(&self) -> Vec<ComponentTypeId> {
        let mut types = self.required.clone();
        for f in &self.filters {
            if let QueryFilter::With(ty) = f
                && !types.contains(ty)
            {
                types.push(*ty);
            }
        }
        types
    }

    /// Returns the component types a matched entity must not hold.
    #[must_use]
    pub fn excluded_types(&self) -> Vec<ComponentTypeId> {
        self.filters
            .iter()
            .filter_map(|f| match f {
                QueryFilter::Without(ty) => Some(*ty),
                QueryFilter::With(_) => None,
            })
            .collect()
    }
}

/// A filter that narrows the set of entities matched by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFilter {
    /// Only match entities that have this component.
    With(ComponentTypeId),
    /// Only match entities that do NOT have this component.
    Without(ComponentTypeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    impl Component for Alpha {}
    struct Beta;
    impl Component for Beta {}
    struct Gamma;
    impl Component for Gamma {}

    #[test]
    fn test_required_types_merges_with_filters() {
        let a = ComponentTypeId::of::<Alpha>();
        let b = ComponentTypeId::of::<Beta>();
        let q = QueryDescriptor::new()
            .require(a)
            .filter(QueryFilter::With(b))
            .filter(QueryFilter::With(a));
        assert_eq!(q.required_types(), vec![a, b]);
    }

    #[test]
    fn test_require_is_deduplicated() {
        let a = ComponentTypeId::of::<Alpha>();
        let q = QueryDescriptor::new().require(a).require(a);
        assert_eq!(q.required, vec![a]);
    }

    #[test]
    fn test_excluded_types() {
        let a = ComponentTypeId::of::<Alpha>();
        let c = ComponentTypeId::of::<Gamma>();
        let q = QueryDescriptor::new()
            .require(a)
            .filter(QueryFilter::Without(c));
        assert_eq!(q.excluded_types(), vec![c]);
        assert!(!q.required_types().contains(&c));
    }
}
