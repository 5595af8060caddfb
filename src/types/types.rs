use std::collections::{HashMap, HashSet};

use id_arena::{Arena, Id};

use crate::{
    errors::errors::ErrorImpl,
    symbols::{scope::FieldTableId, symbol::SymbolTable},
};

pub type TypeId = Id<Type>;

/// Value of an untyped numeric constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
}

impl ConstValue {
    /// Integral values, including floats with no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConstValue::Int(value) => Some(*value),
            ConstValue::Float(value)
                if value.fract() == 0.0 && *value >= i64::MIN as f64 && *value <= i64::MAX as f64 =>
            {
                Some(*value as i64)
            }
            ConstValue::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> f64 {
        match self {
            ConstValue::Int(value) => *value as f64,
            ConstValue::Float(value) => *value,
        }
    }

    /// Text the constant is interned under.
    pub fn canonical_text(&self) -> String {
        match self {
            ConstValue::Int(value) => value.to_string(),
            ConstValue::Float(value) => format!("{:?}", value),
        }
    }

    /// Parses a Go integer or floating-point literal.
    pub fn parse(text: &str) -> Option<ConstValue> {
        let digits = text.replace('_', "");
        let lower = digits.to_ascii_lowercase();

        if let Some(hex) = lower.strip_prefix("0x") {
            return i64::from_str_radix(hex, 16).ok().map(ConstValue::Int);
        }
        if let Some(binary) = lower.strip_prefix("0b") {
            return i64::from_str_radix(binary, 2).ok().map(ConstValue::Int);
        }
        if let Some(octal) = lower.strip_prefix("0o") {
            return i64::from_str_radix(octal, 8).ok().map(ConstValue::Int);
        }

        if lower.contains(['.', 'e']) {
            return lower
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(ConstValue::Float);
        }

        if lower.len() > 1 && lower.starts_with('0') {
            return i64::from_str_radix(&lower[1..], 8).ok().map(ConstValue::Int);
        }

        lower.parse::<i64>().ok().map(ConstValue::Int)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UntypedNumber {
    pub text: String,
    pub value: ConstValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Declared but not filled yet.
    Pending,
    Unknown,
    Void,
    Any,
    VariadicAny,
    /// Argument of `len` and `cap`.
    Aps,
    Label,
    Nil,
    Bool,
    String,
    Int {
        bits: u8,
    },
    Uint {
        bits: u8,
    },
    Float {
        bits: u8,
    },
    Untyped(UntypedNumber),
    /// A negative size means the length is not known yet.
    Array {
        elem: TypeId,
        size: i64,
    },
    Slice {
        elem: TypeId,
    },
    Pointer {
        base: TypeId,
    },
    Struct {
        fields: FieldTableId,
    },
    Function {
        params: Vec<TypeId>,
        results: Vec<TypeId>,
    },
    List(Vec<TypeId>),
}

#[derive(Debug, Clone)]
pub struct Type {
    pub name: Option<String>,
    pub kind: TypeKind,
    pub named: bool,
}

/// Slots allocated up front for the sentinels and predeclared types.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub unknown: TypeId,
    pub void: TypeId,
    pub any: TypeId,
    pub variadic_any: TypeId,
    pub aps: TypeId,
    pub label: TypeId,
    pub nil: TypeId,
    pub boolean: TypeId,
    pub string: TypeId,
    pub int: TypeId,
    pub int8: TypeId,
    pub int16: TypeId,
    pub int32: TypeId,
    pub int64: TypeId,
    pub uint: TypeId,
    pub uint8: TypeId,
    pub uint16: TypeId,
    pub uint32: TypeId,
    pub uint64: TypeId,
    pub float32: TypeId,
    pub float64: TypeId,
    pub zero: TypeId,
}

pub struct TypeArena {
    arena: Arena<Type>,
    untyped: HashMap<String, TypeId>,
    pointers: HashMap<TypeId, TypeId>,
    pub builtins: Builtins,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        let mut arena = Arena::new();

        let mut sentinel = |name: &str, kind: TypeKind, named: bool| {
            arena.alloc(Type {
                name: Some(String::from(name)),
                kind,
                named,
            })
        };

        let unknown = sentinel("???", TypeKind::Unknown, false);
        let void = sentinel("(void)", TypeKind::Void, false);
        let any = sentinel("(any)", TypeKind::Any, false);
        let variadic_any = sentinel("...(any)", TypeKind::VariadicAny, false);
        let aps = sentinel("array/*array/slice/string", TypeKind::Aps, false);
        let label = sentinel("(label)", TypeKind::Label, false);
        let nil = sentinel("nil", TypeKind::Nil, false);
        let boolean = sentinel("bool", TypeKind::Bool, true);
        let string = sentinel("string", TypeKind::String, true);
        let int = sentinel("int", TypeKind::Int { bits: 64 }, true);
        let int8 = sentinel("int8", TypeKind::Int { bits: 8 }, true);
        let int16 = sentinel("int16", TypeKind::Int { bits: 16 }, true);
        let int32 = sentinel("int32", TypeKind::Int { bits: 32 }, true);
        let int64 = sentinel("int64", TypeKind::Int { bits: 64 }, true);
        let uint = sentinel("uint", TypeKind::Uint { bits: 64 }, true);
        let uint8 = sentinel("uint8", TypeKind::Uint { bits: 8 }, true);
        let uint16 = sentinel("uint16", TypeKind::Uint { bits: 16 }, true);
        let uint32 = sentinel("uint32", TypeKind::Uint { bits: 32 }, true);
        let uint64 = sentinel("uint64", TypeKind::Uint { bits: 64 }, true);
        let float32 = sentinel("float32", TypeKind::Float { bits: 32 }, true);
        let float64 = sentinel("float64", TypeKind::Float { bits: 64 }, true);

        let zero = arena.alloc(Type {
            name: None,
            kind: TypeKind::Untyped(UntypedNumber {
                text: String::from("0"),
                value: ConstValue::Int(0),
            }),
            named: false,
        });

        let mut untyped = HashMap::new();
        untyped.insert(String::from("0"), zero);

        TypeArena {
            arena,
            untyped,
            pointers: HashMap::new(),
            builtins: Builtins {
                unknown,
                void,
                any,
                variadic_any,
                aps,
                label,
                nil,
                boolean,
                string,
                int,
                int8,
                int16,
                int32,
                int64,
                uint,
                uint8,
                uint16,
                uint32,
                uint64,
                float32,
                float64,
                zero,
            },
        }
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.arena[id]
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.arena[id].kind
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    fn alloc(&mut self, kind: TypeKind) -> TypeId {
        self.arena.alloc(Type {
            name: None,
            kind,
            named: false,
        })
    }

    pub fn pending(&mut self) -> TypeId {
        self.alloc(TypeKind::Pending)
    }

    /// Predeclared signed integer type of the given width.
    pub fn int(&self, bits: u8) -> TypeId {
        match bits {
            8 => self.builtins.int8,
            16 => self.builtins.int16,
            32 => self.builtins.int32,
            _ => self.builtins.int64,
        }
    }

    pub fn uint(&self, bits: u8) -> TypeId {
        match bits {
            8 => self.builtins.uint8,
            16 => self.builtins.uint16,
            32 => self.builtins.uint32,
            _ => self.builtins.uint64,
        }
    }

    pub fn float(&self, bits: u8) -> TypeId {
        match bits {
            32 => self.builtins.float32,
            _ => self.builtins.float64,
        }
    }

    /// Interns the untyped constant spelled by `text`.
    pub fn untyped_number(&mut self, text: &str) -> Result<TypeId, ErrorImpl> {
        let value = ConstValue::parse(text).ok_or_else(|| ErrorImpl::NumberParseError {
            token: String::from(text),
        })?;

        Ok(self.untyped_value(value))
    }

    pub fn untyped_value(&mut self, value: ConstValue) -> TypeId {
        let text = value.canonical_text();
        if let Some(id) = self.untyped.get(&text) {
            return *id;
        }

        let id = self.alloc(TypeKind::Untyped(UntypedNumber {
            text: text.clone(),
            value,
        }));
        self.untyped.insert(text, id);
        id
    }

    pub fn array(&mut self, elem: TypeId, size: i64) -> TypeId {
        self.alloc(TypeKind::Array { elem, size })
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.alloc(TypeKind::Slice { elem })
    }

    pub fn pointer(&mut self, base: TypeId) -> TypeId {
        if let Some(id) = self.pointers.get(&base) {
            return *id;
        }

        let id = self.alloc(TypeKind::Pointer { base });
        self.pointers.insert(base, id);
        id
    }

    pub fn struct_type(&mut self, fields: FieldTableId) -> TypeId {
        self.alloc(TypeKind::Struct { fields })
    }

    pub fn function(&mut self, params: Vec<TypeId>, results: Vec<TypeId>) -> TypeId {
        self.alloc(TypeKind::Function { params, results })
    }

    pub fn type_list(&mut self, elems: Vec<TypeId>) -> TypeId {
        self.alloc(TypeKind::List(elems))
    }

    /// Gives `id` the name `name`. A type already carrying that name is
    /// returned as is; anything else is copied into a fresh named slot.
    pub fn make_named_copy(&mut self, id: TypeId, name: &str) -> TypeId {
        let ty = &self.arena[id];
        if ty.named && ty.name.as_deref() == Some(name) {
            return id;
        }

        let kind = ty.kind.clone();
        self.arena.alloc(Type {
            name: Some(String::from(name)),
            kind,
            named: true,
        })
    }

    /// Fills a pre-declared slot with the contents of `underlying`.
    pub fn fill_named(&mut self, slot: TypeId, underlying: TypeId, name: &str) {
        let kind = self.arena[underlying].kind.clone();
        let ty = &mut self.arena[slot];
        ty.kind = kind;
        ty.name = Some(String::from(name));
        ty.named = true;
    }

    pub fn replace(&mut self, slot: TypeId, kind: TypeKind) {
        self.arena[slot].kind = kind;
    }

    pub fn is_pending(&self, id: TypeId) -> bool {
        matches!(self.arena[id].kind, TypeKind::Pending)
    }

    pub fn is_named(&self, id: TypeId) -> bool {
        self.arena[id].named
    }

    pub fn is_integer(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Int { .. } | TypeKind::Uint { .. })
    }

    pub fn is_unsigned(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Uint { .. })
    }

    pub fn is_float(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Float { .. })
    }

    pub fn is_numeric(&self, id: TypeId) -> bool {
        matches!(
            self.kind(id),
            TypeKind::Int { .. } | TypeKind::Uint { .. } | TypeKind::Float { .. } | TypeKind::Untyped(_)
        )
    }

    pub fn untyped(&self, id: TypeId) -> Option<&UntypedNumber> {
        match self.kind(id) {
            TypeKind::Untyped(number) => Some(number),
            _ => None,
        }
    }

    /// A type is complete when no slot reachable from it is pending and
    /// every array length is known.
    pub fn is_complete(&self, id: TypeId, symbols: &SymbolTable) -> bool {
        let mut visited = HashSet::new();
        self.complete_inner(id, symbols, &mut visited)
    }

    fn complete_inner(&self, id: TypeId, symbols: &SymbolTable, visited: &mut HashSet<TypeId>) -> bool {
        // a cycle back through a named slot is complete
        if !visited.insert(id) {
            return true;
        }

        match self.kind(id) {
            TypeKind::Pending => false,
            TypeKind::Array { elem, size } => *size >= 0 && self.complete_inner(*elem, symbols, visited),
            TypeKind::Slice { elem } => self.complete_inner(*elem, symbols, visited),
            TypeKind::Pointer { base } => self.complete_inner(*base, symbols, visited),
            TypeKind::Struct { fields } => symbols
                .fields(*fields)
                .iter()
                .all(|field| self.complete_inner(symbols.symbol(*field).ty, symbols, visited)),
            TypeKind::Function { params, results } => params
                .iter()
                .chain(results.iter())
                .all(|ty| self.complete_inner(*ty, symbols, visited)),
            TypeKind::List(elems) => elems.iter().all(|ty| self.complete_inner(*ty, symbols, visited)),
            _ => true,
        }
    }

    /// Readable Go-style spelling of a type.
    pub fn display(&self, id: TypeId, symbols: &SymbolTable) -> String {
        let ty = &self.arena[id];
        if let Some(name) = &ty.name {
            return name.clone();
        }

        let join = |ids: &[TypeId]| {
            ids.iter()
                .map(|id| self.display(*id, symbols))
                .collect::<Vec<String>>()
                .join(", ")
        };

        match &ty.kind {
            TypeKind::Pending => String::from("(pending)"),
            TypeKind::Untyped(number) => format!("({})", number.text),
            TypeKind::Array { elem, size } if *size < 0 => format!("[?]{}", self.display(*elem, symbols)),
            TypeKind::Array { elem, size } => format!("[{}]{}", size, self.display(*elem, symbols)),
            TypeKind::Slice { elem } => format!("[]{}", self.display(*elem, symbols)),
            TypeKind::Pointer { base } => format!("*{}", self.display(*base, symbols)),
            TypeKind::Struct { fields } => {
                let fields = symbols
                    .fields(*fields)
                    .iter()
                    .map(|field| {
                        let field = symbols.symbol(*field);
                        format!("{} {}", field.name, self.display(field.ty, symbols))
                    })
                    .collect::<Vec<String>>();
                format!("struct{{{}}}", fields.join("; "))
            }
            TypeKind::Function { params, results } => match results.len() {
                0 => format!("func({})", join(params)),
                1 => format!("func({}) {}", join(params), self.display(results[0], symbols)),
                _ => format!("func({}) ({})", join(params), join(results)),
            },
            TypeKind::List(elems) => format!("({})", join(elems)),
            other => format!("{:?}", other),
        }
    }
}
