//! `--set KEYPATH=VALUE` handling. The value is JSON and is decoded according
//! to the type of the property the keypath resolves to.

use anyhow::{bail, Context, Result};
use glam::{Vec2, Vec3, Vec4};
use lottie_core::{AnimatableValue, AnimationGraph, SingleValueProvider, ValueKind};
use lottie_data::model::BezierPath;
use serde_json::Value;

pub fn parse_assignment(raw: &str) -> Result<(&str, Value)> {
    let (keypath, value) = raw
        .split_once('=')
        .with_context(|| format!("expected KEYPATH=VALUE, got '{raw}'"))?;
    let keypath = keypath.trim();
    if keypath.is_empty() {
        bail!("missing keypath in '{raw}'");
    }
    let value = serde_json::from_str(value.trim())
        .with_context(|| format!("value for '{keypath}' is not valid JSON"))?;
    Ok((keypath, value))
}

/// Kind of the first property `keypath` resolves to.
fn target_kind(graph: &AnimationGraph, keypath: &str) -> Option<ValueKind> {
    let target = graph.resolve(keypath).into_iter().next()?;
    let node = graph.node(target.node)?;
    Some(node.kind().keypath_property(target.property)?.value_kind())
}

fn floats(value: &Value) -> Result<Vec<f32>> {
    match value {
        Value::Number(n) => Ok(vec![n.as_f64().context("number out of range")? as f32]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_f64()
                    .map(|v| v as f32)
                    .with_context(|| format!("expected a number, got {item}"))
            })
            .collect(),
        other => bail!("expected a number or list of numbers, got {other}"),
    }
}

fn install<T: AnimatableValue>(graph: &mut AnimationGraph, keypath: &str, value: T) -> Result<usize> {
    Ok(graph.set_value_provider(keypath, SingleValueProvider::new(value))?)
}

pub fn apply(graph: &mut AnimationGraph, keypath: &str, value: &Value) -> Result<usize> {
    let Some(kind) = target_kind(graph, keypath) else {
        tracing::warn!("Keypath '{}' matches no property", keypath);
        return Ok(0);
    };

    let installed = match kind {
        ValueKind::Scalar => {
            let v = floats(value)?;
            match v.as_slice() {
                [x] => install(graph, keypath, *x)?,
                _ => bail!("'{keypath}' takes a single number"),
            }
        }
        ValueKind::Vector2 => {
            let v = floats(value)?;
            match v.as_slice() {
                [x, y, ..] => install(graph, keypath, Vec2::new(*x, *y))?,
                [x] => install(graph, keypath, Vec2::splat(*x))?,
                [] => bail!("'{keypath}' takes [x, y]"),
            }
        }
        ValueKind::Vector3 => {
            let v = floats(value)?;
            match v.as_slice() {
                [x, y, z, ..] => install(graph, keypath, Vec3::new(*x, *y, *z))?,
                _ => bail!("'{keypath}' takes [x, y, z]"),
            }
        }
        ValueKind::Color => {
            let v = floats(value)?;
            match v.as_slice() {
                [r, g, b] => install(graph, keypath, Vec4::new(*r, *g, *b, 1.0))?,
                [r, g, b, a, ..] => install(graph, keypath, Vec4::new(*r, *g, *b, *a))?,
                _ => bail!("'{keypath}' takes [r, g, b] or [r, g, b, a]"),
            }
        }
        ValueKind::ScalarList => install(graph, keypath, floats(value)?)?,
        ValueKind::Shape => {
            let shape: BezierPath = serde_json::from_value(value.clone())
                .with_context(|| format!("'{keypath}' takes a path object"))?;
            install(graph, keypath, shape)?
        }
    };

    tracing::info!("Override '{}' installed on {} properties", keypath, installed);
    Ok(installed)
}

pub fn apply_all(graph: &mut AnimationGraph, assignments: &[String]) -> Result<()> {
    for raw in assignments {
        let (keypath, value) = parse_assignment(raw)?;
        apply(graph, keypath, &value)?;
    }
    Ok(())
}
