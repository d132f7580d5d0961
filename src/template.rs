//! Template variable extraction and validation

use log::{debug, error};
use serde_json::{Map, Value};

/// Values to check a template against
#[derive(Debug, Clone)]
pub enum TemplateValues<'a>
{   /// Already decoded mapping
    Map(&'a Map<String, Value>)
  , /// JSON text of an object, decoded before checking
    Json(&'a str)
}

impl<'a> From<&'a Map<String, Value>> for TemplateValues<'a>
{   fn from(map: &'a Map<String, Value>) -> Self
    {   TemplateValues::Map(map)
    }
}

impl<'a> From<&'a str> for TemplateValues<'a>
{   fn from(json: &'a str) -> Self
    {   TemplateValues::Json(json)
    }
}

/// Result of checking values against a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableCheck
{   Satisfied
  , /// First variable that is absent, null or empty
    Missing(String)
}

impl VariableCheck
{   pub fn is_satisfied(&self) -> bool
    {   matches!(self, VariableCheck::Satisfied)
    }

    /// `(true, "")` on success, `(false, name)` otherwise
    pub fn into_pair(self) -> (bool, String)
    {   match self
        {   VariableCheck::Satisfied => (true, String::new())
          , VariableCheck::Missing(name) => (false, name)
        }
    }
}

/// Names of the free variables a template references, sorted.
pub fn get_template_variables(template_str: &str)
  -> Result<Vec<String>, crate::error::Error>
{   let env = minijinja::Environment::new();
    let template = env.template_from_str(template_str).map_err(|e| {
      error!("Template parse error: {}", e);
      crate::error::Error::from(e)
    })?;
    let mut variables: Vec<String>
      = template.undeclared_variables(false).into_iter().collect();
    variables.sort();
    debug!("Template references {} variables", variables.len());
    Ok(variables)
}

/// Check every variable of `template_str` has a usable value.
///
/// Template parse errors and undecodable JSON are returned as `Err`.
pub fn validate_variables_with_template<'a>(
  values: impl Into<TemplateValues<'a>>
, template_str: &str
) -> Result<VariableCheck, crate::error::Error>
{   let decoded;
    let map = match values.into()
    {   TemplateValues::Map(map) => map
      , TemplateValues::Json(json) => {
          decoded = decode_values(json)?;
          &decoded
        }
    };

    for variable in get_template_variables(template_str)?
    {   let usable = match map.get(&variable)
        {   None | Some(Value::Null) => false
          , Some(Value::String(s)) => !s.is_empty()
          , Some(_) => true
        };
        if !usable
        {   debug!("Template variable without value: {}", variable);
            return Ok(VariableCheck::Missing(variable));
        }
    }
    Ok(VariableCheck::Satisfied)
}

fn decode_values(json: &str)
  -> Result<Map<String, Value>, crate::error::Error>
{   match serde_json::from_str::<Value>(json)
    {   Ok(Value::Object(map)) => Ok(map)
      , Ok(other) => {
          error!("Template values are not an object: {}", other);
          Err(crate::error::Error::InvalidValues(
            "expected a JSON object".to_string()
          ))
        }
      , Err(e) => {
          error!("Template values are not valid JSON: {}", e);
          Err(crate::error::Error::InvalidValues(e.to_string()))
        }
    }
}
