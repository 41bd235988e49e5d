// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Minimal XML-RPC encoding for the supervisor control interface.

use crate::error::ControlError;
use quick_xml::escape::escape;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    Double(f64),
    Array(Vec<Value>),
    Struct(BTreeMap<String, Value>),
    Nil,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn member(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.get(name),
            _ => None,
        }
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<value>");
        match self {
            Value::Str(s) => {
                let _ = write!(out, "<string>{}</string>", escape(s.as_str()));
            }
            Value::Int(i) => {
                let _ = write!(out, "<int>{i}</int>");
            }
            Value::Bool(b) => {
                let _ = write!(out, "<boolean>{}</boolean>", u8::from(*b));
            }
            Value::Double(d) => {
                let _ = write!(out, "<double>{d}</double>");
            }
            Value::Array(items) => {
                out.push_str("<array><data>");
                for item in items {
                    item.write_xml(out);
                }
                out.push_str("</data></array>");
            }
            Value::Struct(members) => {
                out.push_str("<struct>");
                for (name, value) in members {
                    let _ = write!(out, "<member><name>{}</name>", escape(name.as_str()));
                    value.write_xml(out);
                    out.push_str("</member>");
                }
                out.push_str("</struct>");
            }
            Value::Nil => out.push_str("<nil/>"),
        }
        out.push_str("</value>");
    }
}

/// Serialize a `methodCall` document.
pub fn method_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall>");
    let _ = write!(out, "<methodName>{}</methodName><params>", escape(method));
    for param in params {
        out.push_str("<param>");
        param.write_xml(&mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    params: Option<RawParams>,
    #[serde(default)]
    fault: Option<RawFault>,
}

#[derive(Debug, Deserialize)]
struct RawParams {
    #[serde(rename = "param", default)]
    params: Vec<RawParam>,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    value: RawValue,
}

#[derive(Debug, Deserialize)]
struct RawFault {
    value: RawValue,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(rename = "$value", default)]
    kind: Option<RawKind>,
}

#[derive(Debug, Deserialize)]
enum RawKind {
    #[serde(rename = "string")]
    Str(String),
    #[serde(rename = "int", alias = "i4", alias = "i8")]
    Int(i64),
    #[serde(rename = "boolean")]
    Bool(u8),
    #[serde(rename = "double")]
    Double(f64),
    #[serde(rename = "dateTime.iso8601", alias = "base64")]
    Opaque(String),
    #[serde(rename = "nil")]
    Nil,
    #[serde(rename = "struct")]
    Struct(RawStruct),
    #[serde(rename = "array")]
    Array(RawArray),
    // Untyped `<value>text</value>` is a string.
    #[serde(rename = "$text")]
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawStruct {
    #[serde(rename = "member", default)]
    members: Vec<RawMember>,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    name: String,
    value: RawValue,
}

#[derive(Debug, Deserialize)]
struct RawArray {
    #[serde(default)]
    data: Option<RawArrayData>,
}

#[derive(Debug, Deserialize)]
struct RawArrayData {
    #[serde(rename = "value", default)]
    values: Vec<RawValue>,
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw.kind {
            None => Value::Str(String::new()),
            Some(RawKind::Str(s) | RawKind::Text(s) | RawKind::Opaque(s)) => Value::Str(s),
            Some(RawKind::Int(i)) => Value::Int(i),
            Some(RawKind::Bool(b)) => Value::Bool(b != 0),
            Some(RawKind::Double(d)) => Value::Double(d),
            Some(RawKind::Nil) => Value::Nil,
            Some(RawKind::Struct(s)) => Value::Struct(
                s.members
                    .into_iter()
                    .map(|m| (m.name, Value::from(m.value)))
                    .collect(),
            ),
            Some(RawKind::Array(a)) => Value::Array(
                a.data
                    .map(|d| d.values.into_iter().map(Value::from).collect())
                    .unwrap_or_default(),
            ),
        }
    }
}

/// Parse a `methodResponse` document into its single return value.
///
/// A `fault` response becomes `ControlError::Fault`.
pub fn parse_response(body: &str) -> Result<Value, ControlError> {
    let raw: RawResponse = quick_xml::de::from_str(body)
        .map_err(|e| ControlError::Malformed(format!("invalid XML-RPC response: {e}")))?;

    if let Some(fault) = raw.fault {
        let fault = Value::from(fault.value);
        let code = fault
            .member("faultCode")
            .and_then(Value::as_int)
            .ok_or_else(|| ControlError::Malformed("fault without faultCode".to_string()))?;
        let message = fault
            .member("faultString")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(ControlError::Fault { code, message });
    }

    raw.params
        .and_then(|p| p.params.into_iter().next())
        .map(|p| Value::from(p.value))
        .ok_or_else(|| ControlError::Malformed("response carries no value".to_string()))
}
