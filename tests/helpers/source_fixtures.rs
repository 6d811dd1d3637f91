//! Models shared by several tests.

/// Two types that specialize each other.
pub const MUTUAL_SPECIALIZATION: &str = r#"
package Cycle {
    part def A :> B {
        attribute a;
    }
    part def B :> A {
        attribute b;
    }
}
"#;

/// `y` redefines `x` and `z` redefines `y` down a specialization chain.
pub const REDEFINITION_CHAIN: &str = r#"
package Chain {
    part def Base {
        attribute x;
        attribute w;
    }
    part def Middle :> Base {
        attribute y :>> x;
    }
    part def Leaf :> Middle {
        attribute z :>> y;
    }
}
"#;

/// A namespace with a nested namespace, imported recursively two ways.
pub const RECURSIVE_IMPORTS: &str = r#"
package N {
    part def A;
    private part def Hidden;
    package M {
        part def C;
    }
}
package WithSelf {
    import N::**;
}
package MembersOnly {
    import N::*::**;
}
"#;

/// Two packages importing each other's members.
pub const CIRCULAR_IMPORTS: &str = r#"
package P1 {
    public import P2::*;
    part def X;
}
package P2 {
    public import P1::*;
    part def Y;
}
"#;

pub const VEHICLE: &str = r#"
package Vehicles {
    attribute def Mass;
    part def Engine {
        attribute cylinders = 4;
    }
    part def Vehicle {
        attribute mass : Mass;
        part engine : Engine;
    }
    part def Car :> Vehicle {
        attribute wheels = 4;
    }
}
"#;
