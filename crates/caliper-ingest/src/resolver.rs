//! Per-call memoization over the storage layer's insert-or-fetch resolvers.
//!
//! One cache instance lives for exactly one ingestion call, so a dimension
//! referenced by both the file's own attributes and its detail rows hits
//! storage once. Caches key on natural keys; directories key on the full
//! path prefix so `a/b` never collides with a `b` elsewhere in the tree.

use std::collections::HashMap;

use rusqlite::Connection;

use caliper_core::errors::CaliperResult;
use caliper_core::measurement::{ItemRef, MetricTypeRef};
use caliper_storage::queries::dimension_ops;

/// Natural-key to id maps for every dimension kind, scoped to one call.
#[derive(Default)]
pub struct DimensionCache {
    nodes: HashMap<String, i64>,
    modules: HashMap<String, i64>,
    versions: HashMap<String, i64>,
    directories: HashMap<Vec<String>, i64>,
    metric_types: HashMap<String, i64>,
    items: HashMap<(String, String, i64), i64>,
    value_types: HashMap<String, i64>,
    classes: HashMap<String, i64>,
}

impl DimensionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an optional flat dimension name. Empty and absent both skip.
    fn resolve_flat(
        cache: &mut HashMap<String, i64>,
        conn: &Connection,
        name: Option<&str>,
        resolve: fn(&Connection, &str) -> CaliperResult<i64>,
    ) -> CaliperResult<Option<i64>> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(None),
        };
        if let Some(id) = cache.get(name) {
            return Ok(Some(*id));
        }
        let id = resolve(conn, name)?;
        cache.insert(name.to_string(), id);
        Ok(Some(id))
    }

    pub fn resolve_node(
        &mut self,
        conn: &Connection,
        name: Option<&str>,
    ) -> CaliperResult<Option<i64>> {
        Self::resolve_flat(&mut self.nodes, conn, name, dimension_ops::resolve_node)
    }

    pub fn resolve_module(
        &mut self,
        conn: &Connection,
        name: Option<&str>,
    ) -> CaliperResult<Option<i64>> {
        Self::resolve_flat(&mut self.modules, conn, name, dimension_ops::resolve_module)
    }

    pub fn resolve_version(
        &mut self,
        conn: &Connection,
        name: Option<&str>,
    ) -> CaliperResult<Option<i64>> {
        Self::resolve_flat(&mut self.versions, conn, name, dimension_ops::resolve_version)
    }

    /// Fold the supplied segments into directory rows, each resolved against
    /// its parent. Returns the deepest id, or None when no segments remain
    /// after skipping empties.
    pub fn resolve_directory_path(
        &mut self,
        conn: &Connection,
        segments: &[Option<&str>],
    ) -> CaliperResult<Option<i64>> {
        let mut path: Vec<String> = Vec::new();
        let mut parent: Option<i64> = None;
        for segment in segments {
            let name = match segment {
                Some(name) if !name.is_empty() => *name,
                _ => continue,
            };
            path.push(name.to_string());
            if let Some(id) = self.directories.get(&path) {
                parent = Some(*id);
                continue;
            }
            let id = dimension_ops::resolve_directory_segment(conn, parent, name)?;
            self.directories.insert(path.clone(), id);
            parent = Some(id);
        }
        Ok(parent)
    }

    pub fn resolve_metric_type(
        &mut self,
        conn: &Connection,
        metric_type: &MetricTypeRef,
    ) -> CaliperResult<i64> {
        if let Some(id) = self.metric_types.get(&metric_type.name) {
            return Ok(*id);
        }
        let id = dimension_ops::resolve_metric_type(
            conn,
            &metric_type.name,
            metric_type.unit.as_deref(),
        )?;
        self.metric_types.insert(metric_type.name.clone(), id);
        Ok(id)
    }

    /// Resolve an item reference, resolving its metric type first.
    pub fn resolve_item(&mut self, conn: &Connection, item: &ItemRef) -> CaliperResult<i64> {
        let metric_type_id = self.resolve_metric_type(conn, &item.metric_type)?;
        let key = (
            item.class_name.clone(),
            item.measure_item_key.clone(),
            metric_type_id,
        );
        if let Some(id) = self.items.get(&key) {
            return Ok(*id);
        }
        let id = dimension_ops::resolve_item(
            conn,
            &item.class_name,
            &item.measure_item_key,
            metric_type_id,
        )?;
        self.items.insert(key, id);
        Ok(id)
    }

    pub fn resolve_value_type(&mut self, conn: &Connection, name: &str) -> CaliperResult<i64> {
        if let Some(id) = self.value_types.get(name) {
            return Ok(*id);
        }
        let id = dimension_ops::resolve_value_type(conn, name)?;
        self.value_types.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn resolve_class(&mut self, conn: &Connection, name: &str) -> CaliperResult<i64> {
        if let Some(id) = self.classes.get(name) {
            return Ok(*id);
        }
        let id = dimension_ops::resolve_class(conn, name)?;
        self.classes.insert(name.to_string(), id);
        Ok(id)
    }
}
