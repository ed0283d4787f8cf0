//! Pattern variants
//!
//! The closed set of constructs the classifier recognizes. Every classified
//! node carries exactly one [`PatternKind`]; filtering and dispatch are plain
//! `match`es over it.

use std::fmt;

// =============================================================================
// PATTERN KIND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    // =========================================================================
    // Structure
    // =========================================================================
    /// Document root
    Plan,
    /// Generic node: recurses, renders as a labeled block
    Node,
    /// Tag with no dedicated variant
    Unrecognized,
    CommandNode,
    AssignmentNode,
    EmptyNode,

    // =========================================================================
    // Control constructs (selected by the `epx` hint)
    // =========================================================================
    If,
    Then,
    ElseIf,
    Else,
    While,
    For,
    /// Loop machinery of a `for` (skip test, body, variable update)
    Auxiliary,
    LoopVariableUpdate,
    Action,
    Try,
    Concurrence,
    /// Node whose only job is to compute a condition other nodes refer to
    ConditionNode,

    // =========================================================================
    // Conditions
    // =========================================================================
    Condition(ConditionKind),

    // =========================================================================
    // Declarations
    // =========================================================================
    DeclareVariable,
    DeclareArray,
    InitialValue,
    CommandDeclaration,
    StateDeclaration,
    Parameter,
    Return,
    /// Library interface variable, read-only
    In,
    /// Library interface variable, read-write
    InOut,
    /// Library interface variable, written by the library node
    Out,
    /// Signature of a library node: `LibraryAction Name(In ..., InOut ...);`
    LibraryNodeDeclaration,

    // =========================================================================
    // Statements
    // =========================================================================
    Assignment,
    Command,
    Name,
    Arguments,
    Update,
    Pair,
    LibraryNodeCall,
    Alias,

    // =========================================================================
    // Expressions
    // =========================================================================
    /// Single-operand wrapper (`NumericRHS`, `Index`, `Tolerance`, ...)
    Value,
    ArrayValue,
    ArrayElement,
    Operator(BinaryOperator),
    Not,
    Function(Function),
    Lookup(LookupKind),
    NodeVariable(NodeVariableKind),
    NodeTimepoint,
    /// Literal written as an empty element (`<PlusInfinity/>`, `<Executing/>`, ...)
    Constant(Constant),
}

impl PatternKind {
    pub fn is_condition(&self) -> bool {
        matches!(self, PatternKind::Condition(_))
    }

    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            PatternKind::DeclareVariable
                | PatternKind::DeclareArray
                | PatternKind::CommandDeclaration
                | PatternKind::StateDeclaration
                | PatternKind::In
                | PatternKind::InOut
                | PatternKind::Out
                | PatternKind::LibraryNodeDeclaration
        )
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::Condition(kind) => write!(f, "{}", kind.keyword()),
            PatternKind::Operator(op) => write!(f, "{:?} operator", op),
            PatternKind::Function(function) => write!(f, "{} function", function.name()),
            PatternKind::Lookup(kind) => write!(f, "{:?}", kind),
            PatternKind::NodeVariable(kind) => write!(f, "{:?}", kind),
            PatternKind::Constant(constant) => write!(f, "{} constant", constant.literal()),
            other => write!(f, "{:?}", other),
        }
    }
}

// =============================================================================
// CONDITIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Start,
    End,
    Skip,
    Repeat,
    Pre,
    Post,
    Invariant,
    Exit,
    Success,
}

impl ConditionKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "StartCondition" => ConditionKind::Start,
            "EndCondition" => ConditionKind::End,
            "SkipCondition" => ConditionKind::Skip,
            "RepeatCondition" => ConditionKind::Repeat,
            "PreCondition" => ConditionKind::Pre,
            "PostCondition" => ConditionKind::Post,
            "InvariantCondition" => ConditionKind::Invariant,
            "ExitCondition" => ConditionKind::Exit,
            "SuccessCondition" => ConditionKind::Success,
            _ => return None,
        };
        Some(kind)
    }

    /// Surface keyword, identical to the lowered tag
    pub fn keyword(&self) -> &'static str {
        match self {
            ConditionKind::Start => "StartCondition",
            ConditionKind::End => "EndCondition",
            ConditionKind::Skip => "SkipCondition",
            ConditionKind::Repeat => "RepeatCondition",
            ConditionKind::Pre => "PreCondition",
            ConditionKind::Post => "PostCondition",
            ConditionKind::Invariant => "InvariantCondition",
            ConditionKind::Exit => "ExitCondition",
            ConditionKind::Success => "SuccessCondition",
        }
    }
}

// =============================================================================
// OPERATORS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let op = match tag {
            "ADD" | "Concat" => BinaryOperator::Add,
            "SUB" => BinaryOperator::Sub,
            "MUL" => BinaryOperator::Mul,
            "DIV" => BinaryOperator::Div,
            "MOD" => BinaryOperator::Mod,
            "EQ" | "EQNumeric" | "EQBoolean" | "EQString" | "EQInternal" | "EQArray" => {
                BinaryOperator::Eq
            }
            "NE" | "NEQ" | "NENumeric" | "NEBoolean" | "NEString" | "NEInternal" | "NEArray"
            | "NEExpression" => BinaryOperator::Ne,
            "LT" => BinaryOperator::Lt,
            "LE" => BinaryOperator::Le,
            "GT" => BinaryOperator::Gt,
            "GE" => BinaryOperator::Ge,
            "AND" => BinaryOperator::And,
            "OR" => BinaryOperator::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }

    /// Binding strength in the surface grammar (higher binds tighter)
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Eq | BinaryOperator::Ne => 3,
            BinaryOperator::Lt | BinaryOperator::Le | BinaryOperator::Gt | BinaryOperator::Ge => 4,
            BinaryOperator::Add | BinaryOperator::Sub => 5,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 6,
        }
    }

    /// `AND` and `OR` take any number of operands (at least two)
    pub fn is_variadic(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

// =============================================================================
// FUNCTIONS, LOOKUPS, NODE VARIABLES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Abs,
    Sqrt,
    Max,
    Min,
    Ceil,
    Floor,
    Round,
    Trunc,
    IsKnown,
    ArraySize,
    ArrayMaxSize,
}

impl Function {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let function = match tag {
            "ABS" => Function::Abs,
            "SQRT" => Function::Sqrt,
            "MAX" => Function::Max,
            "MIN" => Function::Min,
            "CEIL" => Function::Ceil,
            "FLOOR" => Function::Floor,
            "ROUND" => Function::Round,
            "TRUNC" => Function::Trunc,
            "IsKnown" => Function::IsKnown,
            "ArraySize" => Function::ArraySize,
            "ArrayMaxSize" => Function::ArrayMaxSize,
            _ => return None,
        };
        Some(function)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Abs => "abs",
            Function::Sqrt => "sqrt",
            Function::Max => "max",
            Function::Min => "min",
            Function::Ceil => "ceil",
            Function::Floor => "floor",
            Function::Round => "round",
            Function::Trunc => "trunc",
            Function::IsKnown => "isKnown",
            Function::ArraySize => "arraySize",
            Function::ArrayMaxSize => "arrayMaxSize",
        }
    }

    /// Exact operand count, or `None` when the function is variadic
    pub fn arity(&self) -> Option<usize> {
        match self {
            Function::Max | Function::Min => None,
            _ => Some(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Now,
    OnChange,
    WithFrequency,
}

impl LookupKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "LookupNow" => Some(LookupKind::Now),
            "LookupOnChange" => Some(LookupKind::OnChange),
            "LookupWithFrequency" => Some(LookupKind::WithFrequency),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            LookupKind::Now => "Lookup",
            LookupKind::OnChange => "LookupOnChange",
            LookupKind::WithFrequency => "LookupWithFrequency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeVariableKind {
    State,
    Outcome,
    Failure,
    CommandHandle,
}

impl NodeVariableKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "NodeStateVariable" => Some(NodeVariableKind::State),
            "NodeOutcomeVariable" => Some(NodeVariableKind::Outcome),
            "NodeFailureVariable" => Some(NodeVariableKind::Failure),
            "NodeCommandHandleVariable" => Some(NodeVariableKind::CommandHandle),
            _ => None,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            NodeVariableKind::State => "state",
            NodeVariableKind::Outcome => "outcome",
            NodeVariableKind::Failure => "failure",
            NodeVariableKind::CommandHandle => "command_handle",
        }
    }
}

// =============================================================================
// CONSTANTS
// =============================================================================

/// Values the lowering pass writes as empty elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    PlusInfinity,
    MinusInfinity,

    // Node states
    Inactive,
    Waiting,
    Executing,
    Finishing,
    Failing,
    IterationEnded,
    Finished,

    // Node outcomes
    Success,
    Failure,
    Skipped,

    // Failure types
    PreConditionFailed,
    PostConditionFailed,
    InvariantConditionFailed,
    ParentFailed,

    // Command handles
    CommandSuccess,
    CommandFailed,
}

impl Constant {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let constant = match tag {
            "PlusInfinity" => Constant::PlusInfinity,
            "MinusInfinity" => Constant::MinusInfinity,
            "Inactive" => Constant::Inactive,
            "Waiting" => Constant::Waiting,
            "Executing" => Constant::Executing,
            "Finishing" => Constant::Finishing,
            "Failing" => Constant::Failing,
            "IterationEnded" => Constant::IterationEnded,
            "Finished" => Constant::Finished,
            "Success" => Constant::Success,
            "Failure" => Constant::Failure,
            "Skipped" => Constant::Skipped,
            "PreconditionFailed" => Constant::PreConditionFailed,
            "PostconditionFailed" => Constant::PostConditionFailed,
            "InvariantconditionFailed" => Constant::InvariantConditionFailed,
            "Parentfailed" => Constant::ParentFailed,
            "Succeeded" => Constant::CommandSuccess,
            "Failed" => Constant::CommandFailed,
            _ => return None,
        };
        Some(constant)
    }

    /// Surface spelling
    pub fn literal(&self) -> &'static str {
        match self {
            Constant::PlusInfinity => "PLUS_INFINITY",
            Constant::MinusInfinity => "MINUS_INFINITY",
            Constant::Inactive => "INACTIVE",
            Constant::Waiting => "WAITING",
            Constant::Executing => "EXECUTING",
            Constant::Finishing => "FINISHING",
            Constant::Failing => "FAILING",
            Constant::IterationEnded => "ITERATION_ENDED",
            Constant::Finished => "FINISHED",
            Constant::Success => "SUCCESS",
            Constant::Failure => "FAILURE",
            Constant::Skipped => "SKIPPED",
            Constant::PreConditionFailed => "PRE_CONDITION_FAILED",
            Constant::PostConditionFailed => "POST_CONDITION_FAILED",
            Constant::InvariantConditionFailed => "INVARIANT_CONDITION_FAILED",
            Constant::ParentFailed => "PARENT_FAILED",
            Constant::CommandSuccess => "COMMAND_SUCCESS",
            Constant::CommandFailed => "COMMAND_FAILED",
        }
    }
}
