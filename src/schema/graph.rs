//! Type/field reachability graph and closure computation.
//!
//! Discovery turns the metadata reachable from the root types into an arena
//! of [`SchemaNode`]s. Type and field nodes are memoized, so a type that
//! recurs (including through itself) is one shared node and the structure is
//! a graph rather than a tree. [`SchemaGraph::compile`] then walks that graph
//! once and produces the immutable [`Schema`] the traversal engine follows.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};

use super::binding::AttributeBinding;
use super::descriptor::{FieldDescriptor, FieldInfo, Introspect, TypeDescriptor};

/// Index of a node in the schema arena.
pub type NodeId = usize;

/// What a schema node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic root; every type node is one of its children.
    Root,
    /// A discovered type.
    Type(TypeDescriptor),
    /// A declared field.
    Field(FieldDescriptor),
}

/// Node in the schema arena.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    /// What the node stands for.
    pub kind: NodeKind,
    /// Child node ids: a type's fields, or a field's element types.
    pub children: Vec<NodeId>,
}

impl SchemaNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

/// A field as declared on a discovered type.
#[derive(Debug, Clone)]
pub struct DeclaredField {
    /// Identity of the field.
    pub descriptor: FieldDescriptor,
    /// Metadata the field was declared with.
    pub info: FieldInfo,
}

/// The discovered type/field graph.
///
/// # Example
///
/// ```rust
/// use validgraph::schema::{Describe, FieldInfo, SchemaGraph, TypeCatalog, TypeDescriptor, TypeInfo};
///
/// struct Category;
///
/// impl Describe for Category {
///     fn describe() -> TypeInfo {
///         TypeInfo::of::<Category>()
///             .field(FieldInfo::leaf("name").validator("notNull"))
///             .field(FieldInfo::collection::<Category>("children"))
///     }
/// }
///
/// let mut catalog = TypeCatalog::new();
/// let root = catalog.register::<Category>();
/// let graph = SchemaGraph::discover(&catalog, [root]);
///
/// // One shared type node despite the self reference.
/// assert_eq!(graph.type_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    nodes: Vec<SchemaNode>,
    types: IndexMap<TypeDescriptor, NodeId>,
    fields: HashMap<FieldDescriptor, NodeId>,
    declared: IndexMap<TypeDescriptor, Vec<DeclaredField>>,
}

const ROOT: NodeId = 0;

impl SchemaGraph {
    /// Discovers every type and field reachable from `seeds`.
    pub fn discover<I>(introspector: &dyn Introspect, seeds: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let mut graph = Self {
            nodes: vec![SchemaNode::new(NodeKind::Root)],
            types: IndexMap::new(),
            fields: HashMap::new(),
            declared: IndexMap::new(),
        };

        let mut pending: VecDeque<TypeDescriptor> = VecDeque::new();
        for seed in seeds {
            if graph.type_node(&seed).1 {
                pending.push_back(seed);
            }
        }

        while let Some(ty) = pending.pop_front() {
            let type_id = graph.types[&ty];
            let Some(info) = introspector.describe(&ty) else {
                tracing::debug!(type_name = %ty, "no metadata, treating type as opaque");
                continue;
            };
            if info.ignored {
                tracing::debug!(type_name = %ty, "type excluded from validation");
                continue;
            }

            let mut declared = Vec::with_capacity(info.fields.len());
            for field in info.fields {
                let descriptor = FieldDescriptor::new(&ty, &field);
                let field_id = graph.field_node(&descriptor);
                if !graph.nodes[type_id].children.contains(&field_id) {
                    graph.nodes[type_id].children.push(field_id);
                }

                for element in &descriptor.element_types {
                    let (element_id, created) = graph.type_node(element);
                    if !graph.nodes[field_id].children.contains(&element_id) {
                        graph.nodes[field_id].children.push(element_id);
                    }
                    if created {
                        pending.push_back(element.clone());
                    }
                }

                declared.push(DeclaredField {
                    descriptor,
                    info: field,
                });
            }
            graph.declared.insert(ty, declared);
        }

        tracing::debug!(
            types = graph.types.len(),
            fields = graph.fields.len(),
            "schema graph discovered"
        );
        graph
    }

    fn type_node(&mut self, ty: &TypeDescriptor) -> (NodeId, bool) {
        if let Some(&id) = self.types.get(ty) {
            return (id, false);
        }
        let id = self.push_node(NodeKind::Type(ty.clone()));
        self.types.insert(ty.clone(), id);
        self.nodes[ROOT].children.push(id);
        (id, true)
    }

    fn field_node(&mut self, field: &FieldDescriptor) -> NodeId {
        if let Some(&id) = self.fields.get(field) {
            return id;
        }
        let id = self.push_node(NodeKind::Field(field.clone()));
        self.fields.insert(field.clone(), id);
        id
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(SchemaNode::new(kind));
        self.nodes.len() - 1
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the root node is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns a node by id.
    pub fn node(&self, id: NodeId) -> Option<&SchemaNode> {
        self.nodes.get(id)
    }

    /// Number of discovered types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Node id of a discovered type.
    pub fn type_id(&self, ty: &TypeDescriptor) -> Option<NodeId> {
        self.types.get(ty).copied()
    }

    /// Discovered types, in discovery order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.keys()
    }

    /// Declared fields of every described type, in discovery then
    /// declaration order.
    pub fn declared_fields(&self) -> impl Iterator<Item = &DeclaredField> {
        self.declared.values().flatten()
    }

    /// Depth of every node: one plus the depths of its children.
    ///
    /// A child that is already on the computation stack counts as zero, so
    /// cyclic graphs get a finite depth. Sums saturate.
    pub fn depths(&self) -> Vec<usize> {
        let mut memo = vec![None; self.nodes.len()];
        let mut on_stack = vec![false; self.nodes.len()];
        for id in 0..self.nodes.len() {
            self.depth_of(id, &mut memo, &mut on_stack);
        }
        memo.into_iter().map(|d| d.unwrap_or(1)).collect()
    }

    fn depth_of(&self, id: NodeId, memo: &mut [Option<usize>], on_stack: &mut [bool]) -> usize {
        if let Some(depth) = memo[id] {
            return depth;
        }
        if on_stack[id] {
            return 0;
        }
        on_stack[id] = true;
        let mut depth = 1usize;
        for &child in &self.nodes[id].children {
            depth = depth.saturating_add(self.depth_of(child, memo, on_stack));
        }
        on_stack[id] = false;
        memo[id] = Some(depth);
        depth
    }

    /// Marks every node that reaches a bound field.
    ///
    /// Works backwards from the bound fields over parent edges, so each node
    /// is settled once however densely the types refer to each other.
    fn reach_bound(&self, bound: &HashSet<NodeId>) -> (HashSet<NodeId>, IndexSet<TypeDescriptor>) {
        let mut parents: Vec<Vec<NodeId>> = vec![Vec::new(); self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate().skip(1) {
            for &child in &node.children {
                parents[child].push(id);
            }
        }

        let mut needed = bound.clone();
        let mut validatable = IndexSet::new();
        let mut seen: HashSet<NodeId> = bound.clone();
        let mut pending: Vec<NodeId> = bound.iter().copied().collect();
        while let Some(id) = pending.pop() {
            for &parent in &parents[id] {
                if !seen.insert(parent) {
                    continue;
                }
                match &self.nodes[parent].kind {
                    NodeKind::Type(ty) => {
                        validatable.insert(ty.clone());
                    }
                    NodeKind::Field(_) => {
                        needed.insert(parent);
                    }
                    NodeKind::Root => continue,
                }
                pending.push(parent);
            }
        }
        (needed, validatable)
    }

    /// Computes the reachability closure for the given field bindings.
    ///
    /// A field ends up in its owner's closure if it is bound or if a bound
    /// field is reachable below it. Fields keep declaration order.
    pub fn compile(&self, bindings: &HashMap<FieldDescriptor, AttributeBinding>) -> Schema {
        let bound: HashSet<NodeId> = bindings
            .iter()
            .filter(|(_, binding)| binding.is_bound())
            .filter_map(|(field, _)| self.fields.get(field).copied())
            .collect();

        let (needed, mut validatable) = self.reach_bound(&bound);

        for &id in &bound {
            if let NodeKind::Field(field) = &self.nodes[id].kind {
                validatable.insert(field.owner.clone());
            }
        }

        let mut closure = IndexMap::new();
        for (ty, fields) in &self.declared {
            if !validatable.contains(ty) {
                continue;
            }
            let plans: Vec<FieldPlan> = fields
                .iter()
                .filter(|f| {
                    self.fields
                        .get(&f.descriptor)
                        .is_some_and(|id| needed.contains(id))
                })
                .map(|f| FieldPlan {
                    descriptor: f.descriptor.clone(),
                    binding: bindings.get(&f.descriptor).cloned().unwrap_or_default(),
                })
                .collect();
            closure.insert(ty.clone(), plans);
        }

        // Discovery order, so the closure is deterministic.
        let order = |ty: &TypeDescriptor| self.types.get_index_of(ty).unwrap_or(usize::MAX);
        validatable.sort_by(|a, b| order(a).cmp(&order(b)));

        tracing::debug!(
            types = closure.len(),
            fields = closure.values().map(Vec::len).sum::<usize>(),
            "reachability closure computed"
        );

        Schema {
            closure,
            validatable,
        }
    }
}

/// One field the engine visits on a type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPlan {
    /// Identity of the field.
    pub descriptor: FieldDescriptor,
    /// Its binding; unbound fields are only walked through.
    pub binding: AttributeBinding,
}

impl FieldPlan {
    /// Declared field name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Path segment reported for this field.
    pub fn path_segment(&self) -> &str {
        self.binding.path_segment(&self.descriptor.name)
    }
}

/// Immutable result of schema compilation.
///
/// Maps every validatable type to the fields the engine visits on it.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    closure: IndexMap<TypeDescriptor, Vec<FieldPlan>>,
    validatable: IndexSet<TypeDescriptor>,
}

impl Schema {
    /// Fields to visit on `ty`, in declaration order. Empty for unknown
    /// types.
    pub fn fields(&self, ty: &TypeDescriptor) -> &[FieldPlan] {
        self.closure.get(ty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if objects of `ty` are validated.
    pub fn is_validatable(&self, ty: &TypeDescriptor) -> bool {
        self.validatable.contains(ty)
    }

    /// Validatable types.
    pub fn validatable_types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.validatable.iter()
    }

    /// Number of types with closure entries.
    pub fn type_count(&self) -> usize {
        self.closure.len()
    }

    /// Total number of closure entries across types.
    pub fn field_count(&self) -> usize {
        self.closure.values().map(Vec::len).sum()
    }

    /// Number of closure entries carrying at least one validator.
    pub fn bound_field_count(&self) -> usize {
        self.closure
            .values()
            .flatten()
            .filter(|plan| plan.binding.is_bound())
            .count()
    }

    /// Returns true if nothing is validatable.
    pub fn is_empty(&self) -> bool {
        self.validatable.is_empty()
    }

    /// Every plan in the closure.
    pub fn plans(&self) -> impl Iterator<Item = &FieldPlan> {
        self.closure.values().flatten()
    }
}
