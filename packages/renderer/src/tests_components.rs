/// Component invocation tests
/// Function and class contracts, lifecycle ordering, fragments and failure propagation
use crate::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vsnap_vnode::{
    ClassComponent, ComponentInstance, ComponentRef, ComponentResult, ContextMap, FunctionComponent,
    MountState, Node, Props, ResolvedContext, State, Text, Updater,
};

fn state(value: serde_json::Value) -> State {
    value.as_object().cloned().unwrap_or_default()
}

/// Class component setting state in `component_will_mount`
struct Counter;

struct CounterInstance;

impl ClassComponent for Counter {
    fn construct(
        &self,
        _props: &Props,
        _context: &ResolvedContext,
    ) -> ComponentResult<Box<dyn ComponentInstance>> {
        Ok(Box::new(CounterInstance))
    }
}

impl ComponentInstance for CounterInstance {
    fn component_will_mount(&mut self, mount: &mut MountState<'_>) -> ComponentResult<()> {
        mount.replace(state(json!({"count": 1})));
        Ok(())
    }

    fn render(&self, _props: &Props, state: &State, _context: &ResolvedContext) -> ComponentResult {
        let count = state.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
        Ok(Node::element("span").with_child(format!("count={}", count)))
    }
}

/// Class component with both derived state and `component_will_mount`
struct Derived {
    will_mount_calls: Arc<AtomicUsize>,
}

struct DerivedInstance {
    will_mount_calls: Arc<AtomicUsize>,
}

impl ClassComponent for Derived {
    fn construct(
        &self,
        _props: &Props,
        _context: &ResolvedContext,
    ) -> ComponentResult<Box<dyn ComponentInstance>> {
        Ok(Box::new(DerivedInstance {
            will_mount_calls: self.will_mount_calls.clone(),
        }))
    }

    fn get_derived_state_from_props(&self, props: &Props, _state: &State) -> Option<State> {
        Some(state(json!({"label": props.get_str("label").unwrap_or("none")})))
    }
}

impl ComponentInstance for DerivedInstance {
    fn initial_state(&self) -> Option<State> {
        Some(state(json!({"label": "initial", "kept": true})))
    }

    fn component_will_mount(&mut self, mount: &mut MountState<'_>) -> ComponentResult<()> {
        self.will_mount_calls.fetch_add(1, Ordering::SeqCst);
        mount.set_state(state(json!({"label": "from will mount"})));
        Ok(())
    }

    fn render(&self, _props: &Props, state: &State, _context: &ResolvedContext) -> ComponentResult {
        Ok(Node::element("p")
            .with_attr("kept", state.get("kept").cloned().unwrap_or_default())
            .with_child(state.get("label").and_then(|v| v.as_str()).unwrap_or("").to_string()))
    }
}

/// Function component trying to update state while rendering
struct Impatient;

impl FunctionComponent for Impatient {
    fn call(&self, this: &Updater, props: &Props, _context: &ResolvedContext) -> ComponentResult {
        this.set_state(state(json!({"clicked": true})));
        this.force_update();
        Ok(Node::element("button").with_child(props.get_str("label").unwrap_or("").to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("widget failed: {0}")]
struct WidgetError(&'static str);

#[cfg(test)]
mod component_tests {
    use super::*;

    #[test]
    fn test_will_mount_state_is_visible_to_render() {
        let counter = ComponentRef::class(Counter);
        let rendered = render(&Node::component(&counter), None, None).expect("Failed to render");

        let span = rendered.as_element().expect("Expected element");
        assert_eq!(span.node_type, "span");
        assert_eq!(span.children(), &[Rendered::Text(Text::from("count=1"))]);
    }

    #[test]
    fn test_derived_state_takes_precedence_over_will_mount() {
        let calls = Arc::new(AtomicUsize::new(0));
        let derived = ComponentRef::class(Derived {
            will_mount_calls: calls.clone(),
        });

        let node = Node::component(&derived).with_attr("label", "from props");
        let rendered = render(&node, None, None).expect("Failed to render");

        assert_eq!(
            rendered.to_json().unwrap(),
            json!({
                "$$typeof": "react.test.json",
                "type": "p",
                "props": {"kept": true},
                "children": ["from props"]
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_function_component_state_updates_are_discarded() {
        let button = vsnap_vnode::ComponentDef::function_component(Impatient).build();
        let node = Node::component(&button).with_attr("label", "Go");

        let first = render(&node, None, None).expect("Failed to render");
        let second = render(&node, None, None).expect("Failed to render");

        assert_eq!(first, second);
        let button = first.as_element().expect("Expected element");
        assert_eq!(button.children(), &[Rendered::Text(Text::from("Go"))]);
    }

    #[test]
    fn test_component_receives_children_prop() {
        let card = ComponentRef::function(|props, _ctx| {
            Ok(Node::element("section")
                .with_class_name("card")
                .with_children_node(props.children().clone()))
        });

        let node = Node::component(&card)
            .with_child(Node::element("h2").with_child("Title"))
            .with_child("body");
        let rendered = render(&node, None, None).expect("Failed to render");

        let section = rendered.as_element().expect("Expected element");
        assert_eq!(section.prop("class"), Some(&json!("card")));
        assert_eq!(section.children().len(), 2);
        assert_eq!(section.children()[0].as_element().map(|n| n.node_type.as_str()), Some("h2"));
    }

    #[test]
    fn test_component_returning_list_is_spliced() {
        let items = ComponentRef::function(|_props, _ctx| {
            Ok(Node::list(vec![
                Node::element("li").with_child("a"),
                Node::Empty,
                Node::element("li").with_child("b"),
            ]))
        });

        let node = Node::element("ul").with_child(Node::component(&items));
        let rendered = render(&node, None, None).expect("Failed to render");

        let list = rendered.as_element().expect("Expected element");
        assert_eq!(list.children().len(), 2);
        assert!(list.children().iter().all(|child| child.as_element().is_some()));
    }

    #[test]
    fn test_list_equals_explicit_fragment() {
        let children = || vec![Node::from("a"), Node::element("b"), Node::from("c")];

        let list = render(&Node::list(children()), None, None).expect("Failed to render");
        let fragment = render(&Node::fragment(children()), None, None).expect("Failed to render");

        assert_eq!(list, fragment);
        assert_eq!(list.as_fragment().map(<[Rendered]>::len), Some(3));
    }

    #[test]
    fn test_nested_fragments_never_appear_in_output() {
        let node = Node::element("div").with_child(Node::fragment(vec![
            Node::from("one"),
            Node::fragment(vec![Node::from("two")]),
            Node::list(vec![Node::from("three")]),
        ]));

        let rendered = render(&node, None, None).expect("Failed to render");
        assert_eq!(
            rendered.to_json().unwrap(),
            json!({"$$typeof": "react.test.json", "type": "div", "children": ["one", "two", "three"]})
        );
    }

    #[test]
    fn test_component_error_is_passed_through() {
        let broken = ComponentRef::function(|_props, _ctx| Err(WidgetError("no data").into()));
        let node = Node::element("div").with_child(Node::element("span").with_child(Node::component(&broken)));

        let err = render(&node, None, None).unwrap_err();
        assert_eq!(err.to_string(), "widget failed: no data");
        let source = err.as_component_error().expect("Expected component error");
        assert!(source.downcast_ref::<WidgetError>().is_some());
    }

    #[test]
    fn test_class_constructor_error_is_passed_through() {
        struct Refuses;

        impl ClassComponent for Refuses {
            fn construct(
                &self,
                _props: &Props,
                _context: &ResolvedContext,
            ) -> ComponentResult<Box<dyn ComponentInstance>> {
                Err(WidgetError("constructor").into())
            }
        }

        let err = render(&Node::component(&ComponentRef::class(Refuses)), None, None).unwrap_err();
        assert_eq!(err.to_string(), "widget failed: constructor");
    }

    #[test]
    fn test_unbounded_recursion_hits_depth_limit() {
        fn endless(_props: &Props, _ctx: &ResolvedContext) -> ComponentResult {
            Ok(Node::element("div").with_child(Node::component(&ComponentRef::function(endless))))
        }

        let options = RenderOptions {
            max_depth: 8,
            ..Default::default()
        };
        let node = Node::component(&ComponentRef::function(endless));
        let err = render(&node, None, Some(&options)).unwrap_err();

        match err {
            RenderError::DepthExceeded { limit, stack } => {
                assert_eq!(limit, 8);
                assert_eq!(stack.len(), 8);
                assert!(stack.iter().all(|name| name == "endless"));
            }
            other => panic!("Expected depth error, got {:?}", other),
        }
    }

    #[test]
    fn test_sibling_components_do_not_count_towards_depth() {
        let leaf = ComponentRef::function(|_props, _ctx| Ok(Node::element("i")));
        let options = RenderOptions {
            max_depth: 1,
            ..Default::default()
        };
        let node = Node::element("div").with_children((0..5).map(|_| Node::component(&leaf)));

        let rendered = render(&node, None, Some(&options)).expect("Failed to render");
        assert_eq!(rendered.as_element().map(|n| n.children().len()), Some(5));
    }

    #[test]
    fn test_keyed_component_output_is_keyed_element() {
        let row = ComponentRef::function(|props, _ctx| {
            Ok(Node::element("tr").with_key(props.get_str("id").unwrap_or("").to_string()))
        });

        let node = Node::element("tbody").with_children(
            ["a", "b"].into_iter().map(|id| Node::component(&row).with_attr("id", id).with_key(id)),
        );
        let rendered = Renderer::default()
            .render(&node, &ContextMap::new())
            .expect("Failed to render");

        let keys: Vec<_> = rendered
            .as_element()
            .expect("Expected element")
            .children()
            .iter()
            .filter_map(|child| child.as_element().and_then(|n| n.key.clone()))
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
