//! Construction of replacement nodes.

use recast_syntax::{make, GreenNode, NodeHandle};
use recast_types::{CallableSignature, TypeResolver};

use crate::RefactorError;

/// `delegate(T1 p1, ..) { [return] target(p1, ..); }` for a callable `target`.
///
/// The target's own green node is reused as the invoked expression, so the
/// original subtree is shared rather than copied. Parameter types are spelled the
/// shortest way that is valid at the target's position. Parameter names are
/// taken verbatim from the signature.
pub fn build_anonymous_method(
    signature: &CallableSignature,
    target: &NodeHandle,
    resolver: &dyn TypeResolver,
) -> Result<GreenNode, RefactorError> {
    let arguments = signature
        .parameters
        .iter()
        .map(|param| make::identifier_name(&param.name))
        .collect();
    let call = make::invocation(target.green().clone(), make::argument_list(arguments));

    let statement = if signature.returns_void() {
        make::expression_statement(call)
    } else {
        make::return_statement(call)
    };

    let position = target.range().start();
    let parameters = signature
        .parameters
        .iter()
        .map(|param| {
            let text = resolver.minimal_display(&param.ty, position);
            let ty = make::type_name(&text)
                .map_err(|_| RefactorError::InvalidTypeSyntax { text })?;
            Ok(make::parameter(ty, &param.name))
        })
        .collect::<Result<Vec<_>, RefactorError>>()?;
    let parameter_list = (!parameters.is_empty()).then(|| make::parameter_list(parameters));

    Ok(make::anonymous_method(
        parameter_list,
        make::block(vec![statement]),
    ))
}
