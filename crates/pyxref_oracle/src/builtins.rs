//! The CPython builtin namespace, reduced to what `Oracle::builtin_type`
//! needs: is this name a builtin at all, and if so, is it callable. Callable
//! builtins still become fresh locals with no `SymbolInformation` emitted
//! (the Name rule's first step); the callable/non-callable split exists so
//! a consumer oracle with real type information isn't forced to choose one
//! behavior for both.
//!
//! Not exhaustive of `builtins.__dict__` — tuned to the names that actually
//! show up as bare identifiers in real code (functions, types, constants,
//! exceptions). Anything missing here that the oracle can't otherwise
//! resolve simply falls through to an unresolved read, which is the same
//! outcome a syntax-only oracle would give it anyway.
use pyxref_core::oracle::BuiltinType;

const CALLABLE: &[&str] = &[
    "abs", "aiter", "anext", "all", "any", "ascii", "bin", "bool", "breakpoint", "bytearray",
    "bytes", "callable", "chr", "classmethod", "compile", "complex", "delattr", "dict", "dir",
    "divmod", "enumerate", "eval", "exec", "filter", "float", "format", "frozenset", "getattr",
    "globals", "hasattr", "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass",
    "iter", "len", "list", "locals", "map", "max", "memoryview", "min", "next", "object", "oct",
    "open", "ord", "pow", "print", "property", "range", "repr", "reversed", "round", "set",
    "setattr", "slice", "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars",
    "zip", "__import__",
    "BaseException", "Exception", "ArithmeticError", "AssertionError", "AttributeError",
    "BlockingIOError", "BrokenPipeError", "BufferError", "BytesWarning", "ChildProcessError",
    "ConnectionAbortedError", "ConnectionError", "ConnectionRefusedError", "ConnectionResetError",
    "DeprecationWarning", "EOFError", "EnvironmentError", "FileExistsError",
    "FileNotFoundError", "FloatingPointError", "FutureWarning", "GeneratorExit", "IOError",
    "ImportError", "ImportWarning", "IndentationError", "IndexError", "InterruptedError",
    "IsADirectoryError", "KeyError", "KeyboardInterrupt", "LookupError", "MemoryError",
    "ModuleNotFoundError", "NameError", "NotADirectoryError", "NotImplementedError", "OSError",
    "OverflowError", "PendingDeprecationWarning", "PermissionError", "ProcessLookupError",
    "RecursionError", "ReferenceError", "ResourceWarning", "RuntimeError", "RuntimeWarning",
    "StopAsyncIteration", "StopIteration", "SyntaxError", "SyntaxWarning", "SystemError",
    "SystemExit", "TabError", "TimeoutError", "TypeError", "UnboundLocalError",
    "UnicodeDecodeError", "UnicodeEncodeError", "UnicodeError", "UnicodeTranslateError",
    "UnicodeWarning", "UserWarning", "ValueError", "Warning", "ZeroDivisionError",
];

const NON_CALLABLE: &[&str] = &[
    "True", "False", "None", "NotImplemented", "Ellipsis", "__debug__", "__doc__", "__name__",
    "__file__", "__builtins__", "__spec__", "__loader__", "__package__",
];

/// One-line docstrings for the builtins callers actually hit often enough
/// to be worth documenting. Not exhaustive — anything missing here still
/// resolves via `lookup`, just with an empty `SymbolInformation.documentation`.
const DOCSTRINGS: &[(&str, &str)] = &[
    ("print", "Print objects to the text stream file, separated by sep and followed by end."),
    ("len", "Return the number of items in a container."),
    ("range", "Return an object that produces a sequence of integers."),
    ("str", "Create a new string object from the given object."),
    ("int", "Convert a number or string to an integer."),
    ("float", "Convert a string or number to a floating point number."),
    ("list", "Built-in mutable sequence."),
    ("dict", "Create a new dictionary."),
    ("set", "Build an unordered collection of unique elements."),
    ("tuple", "Built-in immutable sequence."),
    ("bool", "Return a boolean value, i.e. one of True or False."),
    ("open", "Open file and return a stream."),
    ("isinstance", "Return whether an object is an instance of a class or of a subclass thereof."),
    ("enumerate", "Return an enumerate object yielding (index, item) pairs."),
    ("zip", "Iterate over several iterables in parallel, producing tuples."),
    ("sorted", "Return a new sorted list from the items in iterable."),
    ("super", "Return a proxy object that delegates method calls to a parent or sibling class."),
    ("getattr", "Get a named attribute from an object."),
    ("setattr", "Set a named attribute on an object."),
    ("hasattr", "Return whether the object has an attribute with the given name."),
];

pub fn lookup(text: &str) -> Option<BuiltinType> {
    if CALLABLE.contains(&text) {
        Some(BuiltinType::Callable)
    } else if NON_CALLABLE.contains(&text) {
        Some(BuiltinType::NonCallable)
    } else {
        None
    }
}

pub fn docstring(text: &str) -> Vec<String> {
    DOCSTRINGS
        .iter()
        .find(|(name, _)| *name == text)
        .map(|(_, doc)| vec![doc.to_string()])
        .unwrap_or_default()
}
