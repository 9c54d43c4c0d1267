//! Common source code fixtures for tests.

// Round-trip corpus
pub const NAMESPACE: &str = "namespace Namespace1\n{\n}\n";

pub const GENERIC_CLASS_WITH_ATTRIBUTE: &str = r#"[Serializable]
public class Repository<T> where T : class
{
}
"#;

pub const PROPERTY_GET_SET: &str = r#"public class Person
{
    public string Name { get; set; }
}
"#;

pub const FOREACH_LOOP: &str = r#"public class Printer
{
    public void PrintAll(string[] lines)
    {
        foreach (var line in lines)
        {
            Console.WriteLine(line);
        }
    }
}
"#;

pub const TRY_CATCH: &str = r#"public class Guard
{
    public void Run()
    {
        try
        {
            Work();
        }
        catch (InvalidOperationException ex) when (ex != null)
        {
            throw;
        }
    }
}
"#;

pub const CRLF_FILE: &str = "using System;\r\n\r\nnamespace N\r\n{\r\n    class C\r\n    {\r\n    }\r\n}\r\n";

// Containers
pub const FOUR_TYPES: &str = r#"public class MyClass { }
public struct MyStructure { }
public enum MyEnum { A, B }
public interface IMyInterface { }
"#;

pub const NESTED_TYPES: &str = r#"namespace Namespace1
{
    public class MyClass
    {
        public class MyNestedClass
        {
            public class MyNestedNestedClass
            {
            }
        }
    }
}
"#;

pub const GENERIC_TYPE_PARAMETERS: &str = "public class Triple<T1, T2, T3>\n{\n}\n";

pub const MEMBERS: &str = r#"namespace Shop
{
    /// An order line
    //[[ Entity(table: "lines", audited: true) ]]
    public class OrderLine
    {
        private int quantity, reserved = 0;
        public event EventHandler Changed;

        public OrderLine(int quantity)
        {
            this.quantity = quantity;
        }

        public decimal Price { get; private set; }

        public decimal Total(decimal discount = 0m)
        {
            return Price * quantity - discount;
        }
    }
}
"#;

pub const BLOCK_COMMENTS: &str = "/* Header\n * spanning lines\n */\nclass Counter\n{\n    /** total so far **/\n    int count; /* trailing */\n\n    void Add(int n)\n    {\n        count = count /* old */ + n;\n    }\n}\n";
