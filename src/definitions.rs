use std::collections::HashMap;

use log::debug;

use crate::config::Context;
use crate::error::{ConfigurationError, Error};
use crate::scene::{Node, Role};
use crate::shape::ShapeSpec;
use crate::transform::Transform;

/// A board description element, possibly referring to a definition by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Shape {
        spec: ShapeSpec,
        role: Role,
    },
    Group {
        id: String,
        transform: Transform,
        children: Vec<Element>,
    },
    Instance {
        id: String,
        definition: String,
        transform: Transform,
    },
}

/// An element tree with every instance expanded.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Shape {
        spec: ShapeSpec,
        role: Role,
    },
    Group {
        id: String,
        transform: Transform,
        children: Vec<Resolved>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Definitions {
    table: HashMap<String, Element>,
}

impl Definitions {
    pub fn insert(&mut self, name: &str, element: Element) {
        self.table.insert(name.to_string(), element);
    }

    pub fn with(mut self, name: &str, element: Element) -> Self {
        self.insert(name, element);
        self
    }

    pub fn resolve(&self, element: &Element) -> Result<Resolved, ConfigurationError> {
        let mut chain = Vec::new();
        self.resolve_element(element, &mut chain)
    }

    fn resolve_element(&self, element: &Element, chain: &mut Vec<String>) -> Result<Resolved, ConfigurationError> {
        match element {
            Element::Shape {
                spec,
                role,
            } => Ok(Resolved::Shape {
                spec: spec.clone(),
                role: *role,
            }),
            Element::Group {
                id,
                transform,
                children,
            } => Ok(Resolved::Group {
                id: id.clone(),
                transform: transform.clone(),
                children: children
                    .iter()
                    .map(|child| self.resolve_element(child, chain))
                    .collect::<Result<_, _>>()?,
            }),
            Element::Instance {
                id,
                definition,
                transform,
            } => {
                if chain.contains(definition) {
                    let mut cycle = chain.clone();
                    cycle.push(definition.clone());
                    return Err(ConfigurationError::CyclicDefinition {
                        chain: cycle,
                    });
                }
                let target = self
                    .table
                    .get(definition)
                    .ok_or_else(|| ConfigurationError::UnknownDefinition {
                        name: definition.clone(),
                    })?;

                chain.push(definition.clone());
                let resolved = self.resolve_element(target, chain);
                chain.pop();
                debug!("expanded instance. id: {}, definition: {}", id, definition);

                Ok(Resolved::Group {
                    id: id.clone(),
                    transform: transform.clone(),
                    children: vec![resolved?],
                })
            }
        }
    }
}

/// Build the geometry of a resolved tree.
pub fn build(resolved: &Resolved, context: &Context) -> Result<Node, Error> {
    match resolved {
        Resolved::Shape {
            spec,
            role,
        } => Ok(Node::shape(spec.build(context)?, *role)),
        Resolved::Group {
            id,
            transform,
            children,
        } => Ok(Node::group(
            id,
            transform.clone(),
            children
                .iter()
                .map(|child| build(child, context))
                .collect::<Result<_, _>>()?,
        )),
    }
}

/// Resolve then build.
pub fn expand(definitions: &Definitions, element: &Element, context: &Context) -> Result<Node, Error> {
    let resolved = definitions.resolve(element)?;
    build(&resolved, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::place;
    use crate::shape::ShapeKind;
    use crate::spacial::Point;

    fn pad() -> Element {
        Element::Shape {
            spec: ShapeSpec::new("pad", ShapeKind::Circle {
                diameter: 1.0,
            }),
            role: Role::Shape,
        }
    }

    fn instance(id: &str, definition: &str, x: f64) -> Element {
        Element::Instance {
            id: id.to_string(),
            definition: definition.to_string(),
            transform: Transform::translate(x, 0.0),
        }
    }

    #[test]
    fn test_nested_instances_expand() {
        // given
        let definitions = Definitions::default()
            .with("pad", pad())
            .with("pair", Element::Group {
                id: "pair".to_string(),
                transform: Transform::identity(),
                children: vec![instance("p1", "pad", 0.0), instance("p2", "pad", 2.5)],
            });
        let board = instance("u1", "pair", 10.0);

        // when
        let node = expand(&definitions, &board, &Context::default()).unwrap();

        // then
        let placed = place(std::slice::from_ref(&node));
        let offsets = placed
            .iter()
            .map(|placed| placed.offset)
            .collect::<Vec<_>>();
        assert_eq!(offsets, vec![Point::new(10.0, 0.0), Point::new(12.5, 0.0)]);
    }

    #[test]
    fn test_unknown_definition() {
        // when
        let result = Definitions::default().resolve(&instance("u1", "missing", 0.0));

        // then
        assert_eq!(
            result,
            Err(ConfigurationError::UnknownDefinition {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_cycle_is_reported_with_chain() {
        // given
        let definitions = Definitions::default()
            .with("a", instance("to_b", "b", 0.0))
            .with("b", Element::Group {
                id: "b".to_string(),
                transform: Transform::identity(),
                children: vec![pad(), instance("to_a", "a", 1.0)],
            });

        // when
        let result = definitions.resolve(&instance("root", "a", 0.0));

        // then
        assert_eq!(
            result,
            Err(ConfigurationError::CyclicDefinition {
                chain: vec!["a".to_string(), "b".to_string(), "a".to_string()]
            })
        );
    }

    #[test]
    fn test_resolution_happens_before_geometry() {
        // given
        let definitions = Definitions::default().with("bad", Element::Shape {
            spec: ShapeSpec::new("broken", ShapeKind::Path {
                value: "not a path".to_string(),
            }),
            role: Role::Shape,
        });
        let board = Element::Group {
            id: "board".to_string(),
            transform: Transform::identity(),
            children: vec![instance("x", "bad", 0.0), instance("y", "missing", 0.0)],
        };

        // when
        let result = expand(&definitions, &board, &Context::default());

        // then
        // the unknown reference is found before the broken path is ever parsed
        assert!(matches!(
            result,
            Err(Error::Configuration(ConfigurationError::UnknownDefinition { .. }))
        ));
    }
}
