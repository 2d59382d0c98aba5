//! Replays a scripted event sequence through the coordinator and prints
//! the resulting command log: a sign-up form inside a scroll view, the
//! keyboard appearing, next/next navigation, then dismissal.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use uplift::Coordinator;
use uplift_core::*;

fn build_tree() -> anyhow::Result<(ViewTree, Vec<NodeId>)> {
    let mut tree = ViewTree::new(Size {
        width: 390.0,
        height: 844.0,
    });
    tree.set_safe_area(EdgeInsets::top(47.0));
    let root = tree.set_root(
        Rect::new(0.0, 0.0, 390.0, 844.0),
        PresentationStyle::FullScreen,
        None,
    );
    let scroll = tree
        .add_container(
            root,
            Rect::new(0.0, 47.0, 390.0, 797.0),
            ContainerKind::Scrollable(ScrollInfo {
                content_size: Size {
                    width: 390.0,
                    height: 1400.0,
                },
                ..ScrollInfo::default()
            }),
            ContainerCaps::empty(),
        )
        .context("adding the scroll container")?;

    let mut fields = Vec::new();
    for (index, y) in [520.0, 600.0, 680.0].into_iter().enumerate() {
        let field = tree
            .add_field(
                scroll,
                Rect::new(16.0, y, 358.0, 44.0),
                FieldNode::text_line().with_tag(index as i32 + 1),
            )
            .context("adding a form field")?;
        fields.push(field);
    }
    Ok((tree, fields))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (tree, fields) = build_tree()?;
    let tree = Rc::new(RefCell::new(tree));
    let sink = Rc::new(RecordingSink::new());
    let coordinator = Rc::new(RefCell::new(Coordinator::new(
        tree.clone(),
        sink.clone(),
        Config::default(),
    )));

    let bus = EventBus::new();
    let _subscription = Coordinator::attach(&coordinator, &bus);

    let first_frame = tree
        .borrow()
        .get(fields[0])
        .map(|n| n.frame)
        .context("first field frame")?;
    bus.publish(&Event::FocusGained {
        field: fields[0],
        frame: first_frame,
    });
    bus.publish(&Event::KeyboardWillShow {
        frame: Rect::new(0.0, 508.0, 390.0, 336.0),
        duration: 0.25,
        curve: AnimationCurve::EaseOut,
    });

    coordinator.borrow_mut().go_next().ok();
    coordinator.borrow_mut().go_next().ok();
    coordinator.borrow_mut().done().ok();

    bus.publish(&Event::KeyboardWillHide { duration: 0.25 });
    bus.publish(&Event::KeyboardDidHide);

    for command in sink.take() {
        println!("{command:?}");
    }
    Ok(())
}
