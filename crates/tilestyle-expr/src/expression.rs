use crate::builder::{compile_tree, CompileError, CompileResult};
use crate::color::Color;
use crate::evaluator::{self, EvalError, EvalResult};
use crate::node::Node;
use crate::pool::ScratchPool;
use crate::shader::{self, ShaderResult, ShaderState};
use crate::subject::Subject;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::str::FromStr;

thread_local! {
    static THREAD_POOL: RefCell<ScratchPool> = RefCell::new(ScratchPool::new());
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExpressionError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    #[tracing::instrument(level = "debug")]
    pub fn compile(source: &str) -> CompileResult<Self> {
        let root = compile_tree(source)?;
        tracing::debug!(kind = %root.kind(), "compiled expression");
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Evaluates with this thread's scratch pool.
    ///
    /// A subject that evaluates expressions from inside [`Subject::property`] re-enters here
    /// while the pool is borrowed. Those nested calls get a fresh pool.
    pub fn evaluate(&self, subject: &dyn Subject) -> EvalResult<Value> {
        THREAD_POOL.with(|pool| match pool.try_borrow_mut() {
            Ok(mut pool) => self.evaluate_in(&mut pool, subject),
            Err(_) => self.evaluate_in(&mut ScratchPool::new(), subject),
        })
    }

    pub fn evaluate_in(&self, pool: &mut ScratchPool, subject: &dyn Subject) -> EvalResult<Value> {
        evaluator::evaluate(&self.root, pool, subject)
    }

    pub fn evaluate_color(&self, subject: &dyn Subject) -> EvalResult<Color> {
        THREAD_POOL.with(|pool| match pool.try_borrow_mut() {
            Ok(mut pool) => self.evaluate_color_in(&mut pool, subject),
            Err(_) => self.evaluate_color_in(&mut ScratchPool::new(), subject),
        })
    }

    pub fn evaluate_color_in(
        &self,
        pool: &mut ScratchPool,
        subject: &dyn Subject,
    ) -> EvalResult<Color> {
        evaluator::evaluate_color(&self.root, pool, subject)
    }

    pub fn shader_expression(&self, attribute_prefix: &str, state: &mut ShaderState) -> ShaderResult {
        shader::emit(&self.root, attribute_prefix, state)
    }

    pub fn shader_function(
        &self,
        function_name: &str,
        attribute_prefix: &str,
        state: &mut ShaderState,
        return_type: &str,
    ) -> ShaderResult {
        let expression = self.shader_expression(attribute_prefix, state)?;
        Ok(format!(
            "{return_type} {function_name}() \n{{ \n    return {expression}; \n}} \n"
        ))
    }
}

impl FromStr for Expression {
    type Err = CompileError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::compile(source)
    }
}

#[derive(Debug, Default)]
pub struct ExpressionCache {
    cache: HashMap<String, Expression>,
    pool: ScratchPool,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&mut self, source: &str) -> CompileResult<&Expression> {
        if !self.cache.contains_key(source) {
            let expression = Expression::compile(source)?;
            self.cache.insert(source.to_string(), expression);
        }
        Ok(&self.cache[source])
    }

    pub fn evaluate(&mut self, source: &str, subject: &dyn Subject) -> Result<Value, ExpressionError> {
        self.compile(source)?;
        let expression = &self.cache[source];
        Ok(expression.evaluate_in(&mut self.pool, subject)?)
    }

    pub fn cached_expressions(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
#[path = "expression_test.rs"]
mod tests;
