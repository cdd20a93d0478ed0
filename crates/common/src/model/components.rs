use super::{
    Callback, ComponentKey, ComponentKind, Example, Extensions, Header, Link, Parameter, PathItem,
    RefOr, RequestBody, Response, Schema, SecurityScheme,
};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Named, typed registries of reusable objects
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Components {
    pub schemas: IndexMap<String, RefOr<Schema>>,
    pub responses: IndexMap<String, RefOr<Response>>,
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    pub examples: IndexMap<String, RefOr<Example>>,
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
    pub headers: IndexMap<String, RefOr<Header>>,
    pub security_schemes: IndexMap<String, RefOr<SecurityScheme>>,
    pub links: IndexMap<String, RefOr<Link>>,
    pub callbacks: IndexMap<String, RefOr<Callback>>,
    pub path_items: IndexMap<String, RefOr<PathItem>>,
    pub extensions: Extensions,
}

/// A model type that can live in a [`Components`] registry
pub trait Component: Sized {
    const KIND: ComponentKind;

    fn registry(components: &Components) -> &IndexMap<String, RefOr<Self>>;

    fn registry_mut(components: &mut Components) -> &mut IndexMap<String, RefOr<Self>>;
}

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn registry(components: &Components) -> &IndexMap<String, RefOr<Self>> {
                &components.$field
            }

            fn registry_mut(components: &mut Components) -> &mut IndexMap<String, RefOr<Self>> {
                &mut components.$field
            }
        }
    };
}

impl_component!(Schema, Schema, schemas);
impl_component!(Response, Response, responses);
impl_component!(Parameter, Parameter, parameters);
impl_component!(Example, Example, examples);
impl_component!(RequestBody, RequestBody, request_bodies);
impl_component!(Header, Header, headers);
impl_component!(SecurityScheme, SecurityScheme, security_schemes);
impl_component!(Link, Link, links);
impl_component!(Callback, Callback, callbacks);
impl_component!(PathItem, PathItem, path_items);

/// Run `$body` with `$reg` bound to the registry of `$kind`
macro_rules! with_registry {
    ($components:expr, $kind:expr, |$reg:ident| $body:expr) => {
        match $kind {
            ComponentKind::Schema => {
                let $reg = &$components.schemas;
                $body
            }
            ComponentKind::Response => {
                let $reg = &$components.responses;
                $body
            }
            ComponentKind::Parameter => {
                let $reg = &$components.parameters;
                $body
            }
            ComponentKind::Example => {
                let $reg = &$components.examples;
                $body
            }
            ComponentKind::RequestBody => {
                let $reg = &$components.request_bodies;
                $body
            }
            ComponentKind::Header => {
                let $reg = &$components.headers;
                $body
            }
            ComponentKind::SecurityScheme => {
                let $reg = &$components.security_schemes;
                $body
            }
            ComponentKind::Link => {
                let $reg = &$components.links;
                $body
            }
            ComponentKind::Callback => {
                let $reg = &$components.callbacks;
                $body
            }
            ComponentKind::PathItem => {
                let $reg = &$components.path_items;
                $body
            }
        }
    };
}

fn retain_keys<T: Clone>(
    registry: &IndexMap<String, RefOr<T>>,
    kind: ComponentKind,
    keep: &BTreeSet<ComponentKey>,
) -> IndexMap<String, RefOr<T>> {
    registry
        .iter()
        .filter(|(name, _)| keep.contains(&ComponentKey::new(kind, name.as_str())))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

impl Components {
    pub fn contains(&self, key: &ComponentKey) -> bool {
        with_registry!(self, key.kind, |registry| registry.contains_key(&key.name))
    }

    /// Registered names of one category, in insertion order
    pub fn names(&self, kind: ComponentKind) -> Vec<&str> {
        with_registry!(self, kind, |registry| registry
            .keys()
            .map(String::as_str)
            .collect())
    }

    /// Every entry key, category order first, then insertion order
    pub fn keys(&self) -> Vec<ComponentKey> {
        ComponentKind::ALL
            .into_iter()
            .flat_map(|kind| {
                self.names(kind)
                    .into_iter()
                    .map(move |name| ComponentKey::new(kind, name))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        ComponentKind::ALL
            .into_iter()
            .map(|kind| with_registry!(self, kind, |registry| registry.len()))
            .sum()
    }

    /// True when no registry holds an entry; extensions are not counted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remove(&mut self, key: &ComponentKey) -> bool {
        let name = key.name.as_str();
        match key.kind {
            ComponentKind::Schema => self.schemas.shift_remove(name).is_some(),
            ComponentKind::Response => self.responses.shift_remove(name).is_some(),
            ComponentKind::Parameter => self.parameters.shift_remove(name).is_some(),
            ComponentKind::Example => self.examples.shift_remove(name).is_some(),
            ComponentKind::RequestBody => self.request_bodies.shift_remove(name).is_some(),
            ComponentKind::Header => self.headers.shift_remove(name).is_some(),
            ComponentKind::SecurityScheme => self.security_schemes.shift_remove(name).is_some(),
            ComponentKind::Link => self.links.shift_remove(name).is_some(),
            ComponentKind::Callback => self.callbacks.shift_remove(name).is_some(),
            ComponentKind::PathItem => self.path_items.shift_remove(name).is_some(),
        }
    }

    /// New bag holding only `keep`, preserving the original order
    pub fn subset(&self, keep: &BTreeSet<ComponentKey>) -> Components {
        Components {
            schemas: retain_keys(&self.schemas, ComponentKind::Schema, keep),
            responses: retain_keys(&self.responses, ComponentKind::Response, keep),
            parameters: retain_keys(&self.parameters, ComponentKind::Parameter, keep),
            examples: retain_keys(&self.examples, ComponentKind::Example, keep),
            request_bodies: retain_keys(&self.request_bodies, ComponentKind::RequestBody, keep),
            headers: retain_keys(&self.headers, ComponentKind::Header, keep),
            security_schemes: retain_keys(
                &self.security_schemes,
                ComponentKind::SecurityScheme,
                keep,
            ),
            links: retain_keys(&self.links, ComponentKind::Link, keep),
            callbacks: retain_keys(&self.callbacks, ComponentKind::Callback, keep),
            path_items: retain_keys(&self.path_items, ComponentKind::PathItem, keep),
            extensions: self.extensions.clone(),
        }
    }
}
