//! Integration tests for the OpenAPI writer

use oaslice_common::{Document, Format, Schema, SpecVersion};
use oaslice_parser::{OpenApiReader, ReaderSettings};
use oaslice_writer::{OpenApiWriter, WriterSettings};
use pretty_assertions::assert_eq;
use serde_json::json;

fn read(text: &str) -> Document {
    let result = OpenApiReader::new(ReaderSettings::default())
        .read_str(text)
        .unwrap();
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    result.document
}

fn write(document: &Document, format: Format, version: Option<SpecVersion>) -> String {
    let output = OpenApiWriter::new(WriterSettings {
        format,
        version,
        ..Default::default()
    })
    .write(document)
    .unwrap();
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    output.text
}

const MINIMAL_V3: &str = r##"{
    "openapi": "3.0.4",
    "info": {"title": "Pets", "version": "1.0.0"},
    "paths": {
        "/pets": {
            "get": {
                "operationId": "listPets",
                "responses": {
                    "200": {
                        "description": "ok",
                        "content": {"application/json": {"schema": {"type": "array", "items": {"type": "string"}}}}
                    }
                }
            }
        }
    },
    "components": {
        "schemas": {
            "Pet": {"type": "object", "required": ["name"], "properties": {"name": {"type": "string"}}}
        }
    }
}"##;

const MINIMAL_V2: &str = r##"{
    "swagger": "2.0",
    "info": {"title": "Pets", "version": "1.0.0"},
    "host": "api.example.com",
    "basePath": "/v1",
    "schemes": ["https"],
    "paths": {
        "/pets": {
            "get": {
                "operationId": "listPets",
                "produces": ["application/json"],
                "responses": {
                    "200": {"description": "ok", "schema": {"type": "array", "items": {"type": "string"}}}
                }
            }
        }
    },
    "definitions": {
        "Pet": {"type": "object", "required": ["name"], "properties": {"name": {"type": "string"}}}
    }
}"##;

#[test]
fn test_round_trip_is_idempotent() {
    let v31 = MINIMAL_V3.replace("\"3.0.4\"", "\"3.1.1\"");
    for source in [MINIMAL_V3, v31.as_str(), MINIMAL_V2] {
        let original = read(source);
        for format in [Format::Json, Format::Yaml] {
            let text = write(&original, format, None);
            let reread = read(&text);
            assert_eq!(reread, original, "{} round trip of\n{}", format, text);
        }
    }
}

#[test]
fn test_v2_round_trip_keeps_server() {
    let original = read(MINIMAL_V2);
    assert_eq!(original.servers[0].url, "https://api.example.com/v1");

    let text = write(&original, Format::Json, None);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["host"], "api.example.com");
    assert_eq!(value["basePath"], "/v1");
    assert_eq!(value["paths"]["/pets"]["get"]["produces"], json!(["application/json"]));
}

#[test]
fn test_nullable_and_bounds_between_v30_and_v31() {
    let source = read(
        r##"{
        "openapi": "3.0.3",
        "info": {"title": "t", "version": "1"},
        "components": {
            "schemas": {
                "Age": {"type": "integer", "nullable": true, "minimum": 0, "exclusiveMinimum": true}
            }
        }
    }"##,
    );

    let (value, diagnostics) = OpenApiWriter::new(WriterSettings {
        version: Some(SpecVersion::V3_1),
        ..Default::default()
    })
    .write_value(&source);
    assert!(diagnostics.is_empty());
    assert_eq!(
        value["components"]["schemas"]["Age"],
        json!({"type": ["integer", "null"], "exclusiveMinimum": 0})
    );

    let upgraded = read(&serde_json::to_string(&value).unwrap());
    assert_eq!(upgraded.spec_version, SpecVersion::V3_1);
    let age: &Schema = upgraded.components.schemas["Age"].as_item().unwrap();
    assert_eq!(age, source.components.schemas["Age"].as_item().unwrap());
}

#[test]
fn test_cycle_is_written_as_reference() {
    let document = read(
        r##"{
        "openapi": "3.0.0",
        "info": {"title": "t", "version": "1"},
        "paths": {
            "/nodes": {
                "get": {
                    "responses": {
                        "200": {
                            "description": "ok",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Node"}}}
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Node": {"type": "object", "properties": {"next": {"$ref": "#/components/schemas/Node"}}}
            }
        }
    }"##,
    );

    let (value, _) = OpenApiWriter::new(WriterSettings {
        inline_local: true,
        ..Default::default()
    })
    .write_value(&document);
    assert_eq!(
        value["paths"]["/nodes"]["get"]["responses"]["200"]["content"]["application/json"]["schema"],
        json!({
            "type": "object",
            "properties": {"next": {"$ref": "#/components/schemas/Node"}}
        })
    );
}

#[test]
fn test_v2_body_parameter_upgrades_to_request_body() {
    let document = read(
        r##"{
        "swagger": "2.0",
        "info": {"title": "t", "version": "1"},
        "consumes": ["application/json"],
        "paths": {
            "/pets": {
                "post": {
                    "parameters": [{"$ref": "#/parameters/PetBody"}],
                    "responses": {"201": {"description": "created"}}
                }
            }
        },
        "parameters": {
            "PetBody": {"name": "pet", "in": "body", "schema": {"$ref": "#/definitions/Pet"}}
        },
        "definitions": {"Pet": {"type": "object"}}
    }"##,
    );

    let (v3, _) = OpenApiWriter::new(WriterSettings {
        version: Some(SpecVersion::V3_0),
        ..Default::default()
    })
    .write_value(&document);
    assert_eq!(
        v3["paths"]["/pets"]["post"]["requestBody"],
        json!({"$ref": "#/components/requestBodies/PetBody"})
    );
    assert_eq!(
        v3["components"]["requestBodies"]["PetBody"]["content"]["application/json"]["schema"],
        json!({"$ref": "#/components/schemas/Pet"})
    );

    // and back again
    let (v2, _) = OpenApiWriter::new(WriterSettings {
        version: Some(SpecVersion::V2_0),
        ..Default::default()
    })
    .write_value(&document);
    assert_eq!(
        v2["paths"]["/pets"]["post"]["parameters"],
        json!([{"$ref": "#/parameters/PetBody"}])
    );
    assert_eq!(v2["parameters"]["PetBody"]["name"], "pet");
    assert_eq!(v2["parameters"]["PetBody"]["in"], "body");
}

#[test]
fn test_paths_and_responses_extensions_round_trip() {
    let document = read(
        r##"{
            "openapi": "3.0.3",
            "info": {"title": "Pets", "version": "1.0.0"},
            "paths": {
                "x-paths-owner": "pets-team",
                "/pets": {
                    "get": {
                        "responses": {
                            "200": {"description": "ok"},
                            "x-responses-note": {"cached": true}
                        }
                    }
                }
            }
        }"##,
    );
    assert_eq!(document.paths.len(), 1);
    assert_eq!(document.paths_extensions["x-paths-owner"], json!("pets-team"));

    for version in [SpecVersion::V2_0, SpecVersion::V3_0, SpecVersion::V3_1] {
        let text = write(&document, Format::Json, Some(version));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["paths"]["x-paths-owner"], json!("pets-team"), "{}", text);
        assert_eq!(
            value["paths"]["/pets"]["get"]["responses"]["x-responses-note"],
            json!({"cached": true}),
            "{}",
            text
        );
        let reread = read(&text);
        assert_eq!(reread.paths_extensions, document.paths_extensions);
        let get = &reread.paths["/pets"].operations[&oaslice_common::HttpMethod::Get];
        assert_eq!(get.responses_extensions["x-responses-note"], json!({"cached": true}));
    }
}
