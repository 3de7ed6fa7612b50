use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: f64,
    pub constant: bool,
}

/// Declared variables and constants, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    variables: Vec<Variable>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding the predefined names `pi`, `e` and `k`.
    #[allow(clippy::approx_constant)]
    pub fn with_predefined() -> Self {
        let mut table = Self::new();
        table.variables.push(Variable {
            name: "pi".to_string(),
            value: 3.1415926535,
            constant: true,
        });
        table.variables.push(Variable {
            name: "e".to_string(),
            value: 2.7182818284,
            constant: true,
        });
        table.variables.push(Variable {
            name: "k".to_string(),
            value: 1000.0,
            constant: false,
        });
        table
    }

    pub fn get_value(&self, name: &str) -> Result<f64, ErrorKind> {
        self.variables
            .iter()
            .find(|variable| variable.name == name)
            .map(|variable| variable.value)
            .ok_or_else(|| ErrorKind::UndefinedVariable(name.to_string()))
    }

    pub fn set_value(&mut self, name: &str, value: f64) -> Result<(), ErrorKind> {
        let variable = self
            .variables
            .iter_mut()
            .find(|variable| variable.name == name)
            .ok_or_else(|| ErrorKind::UndefinedVariable(name.to_string()))?;

        if variable.constant {
            return Err(ErrorKind::ConstantWrite(name.to_string()));
        }
        variable.value = value;
        Ok(())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.variables.iter().any(|variable| variable.name == name)
    }

    pub fn define_name(&mut self, name: &str, value: f64, constant: bool) -> Result<f64, ErrorKind> {
        if self.is_declared(name) {
            return Err(ErrorKind::DuplicateDeclaration(name.to_string()));
        }
        self.variables.push(Variable {
            name: name.to_string(),
            value,
            constant,
        });
        Ok(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
